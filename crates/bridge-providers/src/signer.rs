//! Signers for estimation calls.

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use bridge_types::{Address, SignerError, TransferSigner};

/// Wallet backed by a local private key.
pub struct LocalSigner {
	signer: PrivateKeySigner,
}

impl LocalSigner {
	pub fn new(private_key_hex: &str) -> Result<Self, SignerError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| SignerError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl TransferSigner for LocalSigner {
	async fn address(&self) -> Result<Address, SignerError> {
		Ok(self.signer.address())
	}
}

/// Watch-only wallet: estimates as `address` without holding a key.
pub struct ReadOnlySigner(pub Address);

#[async_trait]
impl TransferSigner for ReadOnlySigner {
	async fn address(&self) -> Result<Address, SignerError> {
		Ok(self.0)
	}
}
