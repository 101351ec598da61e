//! Signer abstraction used to attribute estimation calls to a wallet.

use crate::{errors::SignerError, Address};
use async_trait::async_trait;

/// A connected wallet able to identify itself.
///
/// Gas estimation only needs the sender address; transaction signing is
/// handled outside this system.
#[async_trait]
pub trait TransferSigner: Send + Sync {
	async fn address(&self) -> Result<Address, SignerError>;
}
