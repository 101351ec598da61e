//! Configuration types for the bridge service.

use bridge_types::{BridgeContracts, ChainId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Service identity and logging
	pub service: ServiceSettings,
	/// Gas estimation refresh and retry policy
	#[serde(default)]
	pub estimation: EstimationSettings,
	/// Strategy cache bounds
	#[serde(default)]
	pub cache: CacheSettings,
	/// Parameters shared by the transfer strategies
	#[serde(default)]
	pub strategies: StrategySettings,
	/// Chains the service can route between
	pub chains: Vec<ChainConfig>,
}

impl Config {
	/// Looks up a chain by id.
	pub fn chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
		self.chains.iter().find(|chain| chain.chain_id == chain_id)
	}

	/// `(parent, child)` pairs for every chain that declares a parent.
	pub fn chain_pairs(&self) -> Vec<(ChainId, ChainId)> {
		self.chains
			.iter()
			.filter_map(|chain| chain.parent_chain_id.map(|parent| (parent, chain.chain_id)))
			.collect()
	}
}

/// Service identity and logging
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
	/// Service name used in logs
	pub name: String,
	/// Default log filter, overridden by RUST_LOG
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Log output format
	#[serde(default)]
	pub log_format: LogFormat,
}

fn default_log_level() -> String {
	"info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// Gas estimation refresh and retry policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimationSettings {
	/// Seconds between automatic refreshes
	#[serde(default = "default_refresh_interval_secs")]
	pub refresh_interval_secs: u64,
	/// Extra attempts after a failed estimation
	#[serde(default = "default_retry_count")]
	pub retry_count: u32,
	/// Seconds to wait between attempts
	#[serde(default = "default_retry_interval_secs")]
	pub retry_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
	30
}

fn default_retry_count() -> u32 {
	2
}

fn default_retry_interval_secs() -> u64 {
	5
}

impl Default for EstimationSettings {
	fn default() -> Self {
		Self {
			refresh_interval_secs: default_refresh_interval_secs(),
			retry_count: default_retry_count(),
			retry_interval_secs: default_retry_interval_secs(),
		}
	}
}

impl EstimationSettings {
	pub fn refresh_interval(&self) -> Duration {
		Duration::from_secs(self.refresh_interval_secs)
	}

	pub fn retry_interval(&self) -> Duration {
		Duration::from_secs(self.retry_interval_secs)
	}
}

/// Strategy cache bounds. Both unset keeps every strategy for the process lifetime.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheSettings {
	/// Maximum number of cached strategies
	pub max_entries: Option<usize>,
	/// Seconds after which a cached strategy is rebuilt
	pub ttl_secs: Option<u64>,
}

impl CacheSettings {
	pub fn ttl(&self) -> Option<Duration> {
		self.ttl_secs.map(Duration::from_secs)
	}
}

/// Parameters shared by the transfer strategies
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategySettings {
	/// Gas limit reserved for executing a token deposit's retryable ticket
	#[serde(default = "default_retryable_gas_limit")]
	pub retryable_gas_limit: u64,
}

fn default_retryable_gas_limit() -> u64 {
	300_000
}

impl Default for StrategySettings {
	fn default() -> Self {
		Self {
			retryable_gas_limit: default_retryable_gas_limit(),
		}
	}
}

/// Chain-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	/// Chain identifier
	pub chain_id: ChainId,
	/// Chain name for logging
	pub name: String,
	/// RPC endpoint URL
	pub rpc_url: String,
	/// Parent chain, set for rollups
	pub parent_chain_id: Option<ChainId>,
	/// Bridge contracts connecting this chain to its parent
	pub bridge: Option<BridgeContracts>,
}
