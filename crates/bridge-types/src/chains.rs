//! Chain-related types and traits.

use crate::{errors::ProviderError, Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
	pub const ETHEREUM: Self = Self(1);
	pub const ARBITRUM_ONE: Self = Self(42161);
	pub const ARBITRUM_NOVA: Self = Self(42170);
	pub const SEPOLIA: Self = Self(11155111);
	pub const ARBITRUM_SEPOLIA: Self = Self(421614);
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(ChainId(s.parse()?))
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		ChainId(id)
	}
}

/// Bridge contracts of a child chain.
///
/// The inbox and the parent gateway router are deployed on the parent chain,
/// the child gateway router on the child chain itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeContracts {
	/// Inbox accepting native-currency deposits (parent chain).
	pub inbox: Address,
	/// Token gateway router used for deposits (parent chain).
	pub parent_gateway_router: Address,
	/// Token gateway router used for withdrawals (child chain).
	pub child_gateway_router: Address,
}

/// A read-only contract call whose gas usage can be estimated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
	pub from: Address,
	pub to: Address,
	pub value: U256,
	pub data: Bytes,
}

/// Handle to a single chain's RPC endpoint.
#[async_trait]
pub trait ChainProvider: Send + Sync {
	/// Get the chain ID
	fn chain_id(&self) -> ChainId;

	/// Bridge contracts, present when this chain is a child chain
	fn bridge(&self) -> Option<&BridgeContracts>;

	/// Estimate the gas a call would consume
	async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ProviderError>;

	/// Get current gas price in wei
	async fn gas_price(&self) -> Result<u128, ProviderError>;
}

/// Synchronous, side-effect free provider lookup by chain.
pub trait ProviderRegistry: Send + Sync {
	fn provider(&self, chain_id: ChainId) -> Result<Arc<dyn ChainProvider>, ProviderError>;
}
