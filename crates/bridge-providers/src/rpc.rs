//! Chain provider backed by an alloy HTTP provider.

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use async_trait::async_trait;
use bridge_config::ChainConfig;
use bridge_types::{BridgeContracts, CallRequest, ChainId, ChainProvider, ProviderError};
use tracing::debug;

/// JSON-RPC access to one chain.
pub struct AlloyChainProvider {
	chain_id: ChainId,
	name: String,
	bridge: Option<BridgeContracts>,
	provider: DynProvider,
}

impl AlloyChainProvider {
	/// Connects to the chain's RPC endpoint. No request is made until the
	/// first estimation.
	pub fn new(config: &ChainConfig) -> Result<Self, ProviderError> {
		let provider = ProviderBuilder::new()
			.connect_http(config.rpc_url.parse().map_err(|e| {
				ProviderError::InvalidUrl(format!("{} ({}): {}", config.rpc_url, config.name, e))
			})?)
			.erased();

		debug!("Configured provider for {} ({})", config.name, config.chain_id);

		Ok(Self {
			chain_id: config.chain_id,
			name: config.name.clone(),
			bridge: config.bridge,
			provider,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

#[async_trait]
impl ChainProvider for AlloyChainProvider {
	fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	fn bridge(&self) -> Option<&BridgeContracts> {
		self.bridge.as_ref()
	}

	async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ProviderError> {
		let request = TransactionRequest::default()
			.from(call.from)
			.to(call.to)
			.value(call.value)
			.input(TransactionInput::new(call.data.clone()));

		self.provider.estimate_gas(request).await.map_err(|e| {
			ProviderError::Rpc(format!("Failed to estimate gas on {}: {}", self.name, e))
		})
	}

	async fn gas_price(&self) -> Result<u128, ProviderError> {
		self.provider.get_gas_price().await.map_err(|e| {
			ProviderError::Rpc(format!("Failed to get gas price on {}: {}", self.name, e))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(rpc_url: &str) -> ChainConfig {
		ChainConfig {
			chain_id: ChainId::ARBITRUM_ONE,
			name: "Arbitrum One".to_string(),
			rpc_url: rpc_url.to_string(),
			parent_chain_id: Some(ChainId::ETHEREUM),
			bridge: None,
		}
	}

	#[test]
	fn test_builds_from_config() {
		let provider = AlloyChainProvider::new(&config("http://127.0.0.1:8545")).unwrap();
		assert_eq!(provider.chain_id(), ChainId::ARBITRUM_ONE);
		assert_eq!(provider.name(), "Arbitrum One");
		assert!(provider.bridge().is_none());
	}

	#[test]
	fn test_rejects_unparseable_url() {
		let result = AlloyChainProvider::new(&config("not a url"));
		assert!(matches!(result, Err(ProviderError::InvalidUrl(_))));
	}
}
