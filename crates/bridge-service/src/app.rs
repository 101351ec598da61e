//! Wiring from configuration to the resolution and estimation components.

use anyhow::{Context, Result};
use bridge_config::{CacheSettings, Config};
use bridge_core::{CachePolicy, StrategyFactory};
use bridge_estimation::{EstimationConfig, GasEstimationService, SignerReceiver};
use bridge_providers::StaticProviderRegistry;
use bridge_routing::{ChainPairTable, RouteClassifier};
use bridge_strategies::StrategySettings;
use std::sync::Arc;
use tracing::info;

/// Components shared by the CLI commands.
pub struct App {
	pub config: Config,
	pub factory: Arc<StrategyFactory>,
}

impl App {
	pub fn from_config(config: Config) -> Result<Self> {
		let registry = StaticProviderRegistry::from_config(&config)
			.context("Failed to initialize chain providers")?;

		let pairs = config.chain_pairs();
		info!("Routing between {} chain pairs", pairs.len());
		let classifier = RouteClassifier::new(Arc::new(ChainPairTable::from_pairs(pairs)));

		let factory = StrategyFactory::new(
			classifier,
			Arc::new(registry),
			cache_policy(&config.cache),
			StrategySettings {
				retryable_gas_limit: config.strategies.retryable_gas_limit,
			},
		);

		Ok(Self {
			config,
			factory: Arc::new(factory),
		})
	}

	pub fn estimation_service(&self, signer: SignerReceiver) -> GasEstimationService {
		GasEstimationService::new(self.factory.clone(), signer, self.estimation_config())
	}

	pub fn estimation_config(&self) -> EstimationConfig {
		let settings = &self.config.estimation;
		EstimationConfig {
			refresh_interval: settings.refresh_interval(),
			retry_count: settings.retry_count,
			retry_interval: settings.retry_interval(),
		}
	}
}

fn cache_policy(settings: &CacheSettings) -> CachePolicy {
	CachePolicy {
		max_entries: settings.max_entries,
		ttl: settings.ttl(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_config::ConfigLoader;
	use bridge_strategies::StrategyKind;
	use bridge_types::{ChainId, Route};
	use std::time::Duration;

	const CONFIG: &str = r#"
		[service]
		name = "bridge-test"

		[estimation]
		refresh_interval_secs = 12
		retry_count = 1

		[cache]
		max_entries = 64
		ttl_secs = 600

		[strategies]
		retryable_gas_limit = 250000

		[[chains]]
		chain_id = 1
		name = "Ethereum"
		rpc_url = "http://127.0.0.1:8545"

		[[chains]]
		chain_id = 42161
		name = "Arbitrum One"
		rpc_url = "http://127.0.0.1:8547"
		parent_chain_id = 1

		[chains.bridge]
		inbox = "0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"
		parent_gateway_router = "0x72Ce9c846789fdB6fC1f34aC4AD25Dd9ef7031ef"
		child_gateway_router = "0x5288c571Fd7aD117beA99bF60FE0846C4E84F933"
	"#;

	fn app() -> App {
		let config = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(CONFIG)
			.unwrap();
		App::from_config(config).unwrap()
	}

	#[test]
	fn test_settings_mapping() {
		let app = app();

		let estimation = app.estimation_config();
		assert_eq!(estimation.refresh_interval, Duration::from_secs(12));
		assert_eq!(estimation.retry_count, 1);
		assert_eq!(estimation.retry_interval, Duration::from_secs(5));

		assert_eq!(
			cache_policy(&app.config.cache),
			CachePolicy::unbounded()
				.with_max_entries(64)
				.with_ttl(Duration::from_secs(600))
		);
	}

	#[test]
	fn test_configured_pairs_resolve() {
		let app = app();
		let deposit = Route::new(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE);
		let withdrawal = Route::new(ChainId::ARBITRUM_ONE, ChainId::ETHEREUM);

		assert!(app.factory.classifier().classify(&deposit, None).is_deposit);
		assert_eq!(
			app.factory.resolve(&deposit, None).unwrap().kind(),
			StrategyKind::NativeDeposit
		);
		assert_eq!(
			app.factory.resolve(&withdrawal, None).unwrap().kind(),
			StrategyKind::NativeWithdrawal
		);
		assert!(app
			.factory
			.resolve(&Route::new(ChainId::ETHEREUM, ChainId(10)), None)
			.is_err());
	}
}
