//! Provider registry built once from configuration.

use crate::rpc::AlloyChainProvider;
use bridge_config::Config;
use bridge_types::{ChainId, ChainProvider, ProviderError, ProviderRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Fixed set of chain providers; lookups never touch the network.
#[derive(Default, Clone)]
pub struct StaticProviderRegistry {
	providers: HashMap<ChainId, Arc<dyn ChainProvider>>,
}

impl StaticProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an alloy provider for every configured chain.
	pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
		let mut registry = Self::new();
		for chain in &config.chains {
			registry.insert(Arc::new(AlloyChainProvider::new(chain)?));
		}
		info!("Initialized {} chain providers", registry.providers.len());
		Ok(registry)
	}

	pub fn insert(&mut self, provider: Arc<dyn ChainProvider>) {
		self.providers.insert(provider.chain_id(), provider);
	}

	pub fn chain_ids(&self) -> Vec<ChainId> {
		let mut ids: Vec<_> = self.providers.keys().copied().collect();
		ids.sort();
		ids
	}
}

impl ProviderRegistry for StaticProviderRegistry {
	fn provider(&self, chain_id: ChainId) -> Result<Arc<dyn ChainProvider>, ProviderError> {
		self.providers
			.get(&chain_id)
			.cloned()
			.ok_or(ProviderError::UnknownChain(chain_id))
	}
}
