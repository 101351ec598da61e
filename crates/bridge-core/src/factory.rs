//! Strategy resolution.

use crate::cache::{CachePolicy, Lookup, StrategyCache};
use crate::key::cache_key;
use crate::selection::select_variant;
use crate::FactoryError;
use bridge_routing::RouteClassifier;
use bridge_strategies::{StrategyInit, StrategySettings, TransferStrategy};
use bridge_types::{Adapters, ProviderRegistry, Route, TransferCharacteristics};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Snapshot of the factory's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryStats {
	pub cache_hits: u64,
	pub constructed: u64,
	pub construction_failures: u64,
	pub unsupported: u64,
	pub cached: usize,
}

#[derive(Default)]
struct Counters {
	cache_hits: AtomicU64,
	constructed: AtomicU64,
	construction_failures: AtomicU64,
	unsupported: AtomicU64,
}

/// Resolves routes to shared, cached transfer strategies.
pub struct StrategyFactory {
	classifier: RouteClassifier,
	providers: Arc<dyn ProviderRegistry>,
	cache: StrategyCache,
	settings: StrategySettings,
	counters: Counters,
}

impl StrategyFactory {
	pub fn new(
		classifier: RouteClassifier,
		providers: Arc<dyn ProviderRegistry>,
		policy: CachePolicy,
		settings: StrategySettings,
	) -> Self {
		Self {
			classifier,
			providers,
			cache: StrategyCache::new(policy),
			settings,
			counters: Counters::default(),
		}
	}

	pub fn classifier(&self) -> &RouteClassifier {
		&self.classifier
	}

	/// Returns the strategy for a route, constructing it on first use.
	///
	/// The cache is keyed by the route alone. Once a route has resolved,
	/// later calls get the same instance whatever adapters they pass.
	pub fn resolve(
		&self,
		route: &Route,
		adapters: Option<&Adapters>,
	) -> Result<Arc<TransferStrategy>, FactoryError> {
		let characteristics = self.classifier.classify(route, adapters);
		if !characteristics.is_supported {
			self.counters.unsupported.fetch_add(1, Ordering::Relaxed);
			debug!(%route, "Rejecting unsupported transfer");
			return Err(FactoryError::UnsupportedTransfer {
				route: route.to_string(),
			});
		}

		let key = cache_key(route);
		let lookup = self
			.cache
			.get_or_try_insert_with(&key, || self.construct(route, adapters, &characteristics));

		match lookup {
			Ok(Lookup::Hit(strategy)) => {
				self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
				self.warn_on_adapter_mismatch(&key, &strategy, &characteristics, adapters);
				Ok(strategy)
			}
			Ok(Lookup::Inserted(strategy)) => {
				self.counters.constructed.fetch_add(1, Ordering::Relaxed);
				Ok(strategy)
			}
			Err(e) => {
				self.counters
					.construction_failures
					.fetch_add(1, Ordering::Relaxed);
				warn!(%route, error = %e, "Failed to construct transfer strategy");
				Err(e)
			}
		}
	}

	pub fn stats(&self) -> FactoryStats {
		FactoryStats {
			cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
			constructed: self.counters.constructed.load(Ordering::Relaxed),
			construction_failures: self.counters.construction_failures.load(Ordering::Relaxed),
			unsupported: self.counters.unsupported.load(Ordering::Relaxed),
			cached: self.cache.len(),
		}
	}

	/// Drops every cached strategy.
	pub fn clear_cache(&self) {
		self.cache.clear();
	}

	fn construct(
		&self,
		route: &Route,
		adapters: Option<&Adapters>,
		characteristics: &TransferCharacteristics,
	) -> Result<Arc<TransferStrategy>, FactoryError> {
		let kind = select_variant(characteristics, adapters);

		let init = StrategyInit {
			source_provider: self.providers.provider(route.source_chain_id)?,
			destination_provider: self.providers.provider(route.destination_chain_id)?,
			source_token_address: route.source_token_address,
			destination_token_address: route.destination_token_address,
			adapters: adapters.copied(),
			settings: self.settings,
		};

		let strategy = TransferStrategy::build(kind, init)?;
		info!(%route, %kind, "Constructed transfer strategy");
		Ok(Arc::new(strategy))
	}

	fn warn_on_adapter_mismatch(
		&self,
		key: &str,
		cached: &TransferStrategy,
		characteristics: &TransferCharacteristics,
		adapters: Option<&Adapters>,
	) {
		// Only token deposits pick their variant from the adapters
		if !characteristics.is_deposit || characteristics.is_native_currency_transfer {
			return;
		}

		let has_adapter = adapters.and_then(|a| a.deposit).is_some();
		if has_adapter != cached.kind().uses_adapter() {
			warn!(
				key,
				cached = %cached.kind(),
				has_adapter,
				"Serving cached strategy built with different adapters"
			);
		}
	}
}
