//! Signer source watched by the estimation drivers.

use bridge_types::TransferSigner;
use std::sync::Arc;
use tokio::sync::watch;

/// Currently connected signer, or `None` while no wallet is connected.
pub type SignerReceiver = watch::Receiver<Option<Arc<dyn TransferSigner>>>;

/// Publishing side of a [`SignerReceiver`].
pub type SignerSender = watch::Sender<Option<Arc<dyn TransferSigner>>>;

/// Creates a signer source starting at `initial`.
pub fn signer_channel(initial: Option<Arc<dyn TransferSigner>>) -> (SignerSender, SignerReceiver) {
	watch::channel(initial)
}
