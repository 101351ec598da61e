//! Error types shared by the collaborator interfaces.

use crate::ChainId;
use thiserror::Error;

/// Errors raised by chain providers and provider lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
	/// No provider is registered for the requested chain.
	#[error("No provider configured for chain {0}")]
	UnknownChain(ChainId),
	/// The RPC endpoint could not be parsed.
	#[error("Invalid RPC URL: {0}")]
	InvalidUrl(String),
	/// The node rejected or failed the request.
	#[error("RPC error: {0}")]
	Rpc(String),
}

/// Errors raised by signers.
#[derive(Debug, Error)]
pub enum SignerError {
	#[error("Signer unavailable: {0}")]
	Unavailable(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}
