//! Configuration loading for the bridge service.
//!
//! Configuration is read from a TOML file, `${VAR}` placeholders are
//! substituted from the environment, a few prefixed environment variables
//! override individual settings, and the result is validated before use.

use regex::Regex;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

mod types;

pub use types::*;

static ENV_PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "BRIDGE_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let Some(file_path) = &self.file_path else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		let content = match tokio::fs::read_to_string(file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.clone()));
			}
			Err(e) => return Err(e.into()),
		};

		debug!("Loaded configuration file {}", file_path);
		self.load_from_str(&content)
	}

	/// Parses, overrides and validates configuration held in memory.
	pub fn load_from_str(&self, content: &str) -> Result<Config, ConfigError> {
		let substituted_content = self.substitute_env_vars(content)?;

		let mut config: Config = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		for cap in ENV_PLACEHOLDER.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.service.log_level = log_level;
		}

		if let Ok(interval) = env::var(format!("{}REFRESH_INTERVAL_SECS", self.env_prefix)) {
			config.estimation.refresh_interval_secs = interval.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid refresh interval: {}", e))
			})?;
		}

		Ok(())
	}
}

/// Checks the chain graph and timing values for consistency.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
	if config.chains.is_empty() {
		return Err(ConfigError::ValidationError(
			"At least one chain must be configured".to_string(),
		));
	}

	let mut seen = HashSet::new();
	for chain in &config.chains {
		if !seen.insert(chain.chain_id) {
			return Err(ConfigError::ValidationError(format!(
				"Chain {} is configured more than once",
				chain.chain_id
			)));
		}

		if !chain.rpc_url.starts_with("http://") && !chain.rpc_url.starts_with("https://") {
			return Err(ConfigError::ValidationError(format!(
				"RPC URL for chain {} must start with http:// or https://",
				chain.name
			)));
		}
	}

	for chain in &config.chains {
		let Some(parent) = chain.parent_chain_id else {
			continue;
		};

		if parent == chain.chain_id {
			return Err(ConfigError::ValidationError(format!(
				"Chain {} cannot be its own parent",
				chain.name
			)));
		}

		if !seen.contains(&parent) {
			return Err(ConfigError::ValidationError(format!(
				"Parent chain {} of {} is not configured",
				parent, chain.name
			)));
		}

		if chain.bridge.is_none() {
			return Err(ConfigError::ValidationError(format!(
				"Chain {} has a parent chain but no bridge contracts",
				chain.name
			)));
		}
	}

	if config.estimation.refresh_interval_secs == 0 {
		return Err(ConfigError::ValidationError(
			"Refresh interval must be greater than zero".to_string(),
		));
	}

	// Retries of one cycle must fit inside a refresh interval
	let retry_budget = u64::from(config.estimation.retry_count)
		.saturating_mul(config.estimation.retry_interval_secs);
	if config.estimation.refresh_interval_secs <= retry_budget {
		return Err(ConfigError::ValidationError(format!(
			"Refresh interval ({}s) must exceed the retry budget of {} retries {}s apart",
			config.estimation.refresh_interval_secs,
			config.estimation.retry_count,
			config.estimation.retry_interval_secs
		)));
	}

	if config.cache.max_entries == Some(0) {
		return Err(ConfigError::ValidationError(
			"Cache max_entries must be greater than zero when set".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::ChainId;
	use std::io::Write;

	fn config_with_rpc(rpc_url: &str) -> String {
		format!(
			r#"
			[service]
			name = "bridge"

			[estimation]
			refresh_interval_secs = 15

			[[chains]]
			chain_id = 11155111
			name = "Sepolia"
			rpc_url = "{rpc_url}"

			[[chains]]
			chain_id = 421614
			name = "Arbitrum Sepolia"
			rpc_url = "https://arb-sepolia.example.com"
			parent_chain_id = 11155111

			[chains.bridge]
			inbox = "0xaAe29B0366299461418F5324a79Afc425BE5ae21"
			parent_gateway_router = "0xcE18836b233C83325Cc8848CA4487e94C6288264"
			child_gateway_router = "0x9fDD1C4E4AA24EEc1d913FABea925594a20d43C7"
			"#
		)
	}

	#[test]
	fn test_load_from_str() {
		let config = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&config_with_rpc("https://sepolia.example.com"))
			.unwrap();

		assert_eq!(config.service.name, "bridge");
		assert_eq!(config.estimation.refresh_interval_secs, 15);
		assert_eq!(
			config.chain_pairs(),
			vec![(ChainId::SEPOLIA, ChainId::ARBITRUM_SEPOLIA)]
		);
	}

	#[test]
	fn test_env_substitution() {
		env::set_var("BRIDGE_TEST_SEPOLIA_RPC", "https://substituted.example.com");
		let config = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&config_with_rpc("${BRIDGE_TEST_SEPOLIA_RPC}"))
			.unwrap();

		assert_eq!(
			config.chain(ChainId::SEPOLIA).unwrap().rpc_url,
			"https://substituted.example.com"
		);
	}

	#[test]
	fn test_missing_env_var() {
		let result = ConfigLoader::new().load_from_str(&config_with_rpc("${BRIDGE_TEST_NEVER_SET}"));

		match result {
			Err(ConfigError::EnvVarNotFound(name)) => assert_eq!(name, "BRIDGE_TEST_NEVER_SET"),
			other => panic!("Expected EnvVarNotFound, got {:?}", other),
		}
	}

	#[test]
	fn test_env_overrides() {
		env::set_var("BRIDGE_TEST_OVERRIDE_LOG_LEVEL", "debug");
		env::set_var("BRIDGE_TEST_OVERRIDE_REFRESH_INTERVAL_SECS", "45");

		let config = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_OVERRIDE_")
			.load_from_str(&config_with_rpc("https://sepolia.example.com"))
			.unwrap();

		assert_eq!(config.service.log_level, "debug");
		assert_eq!(config.estimation.refresh_interval_secs, 45);
	}

	#[test]
	fn test_rejects_unknown_parent() {
		let content = config_with_rpc("https://sepolia.example.com")
			.replace("parent_chain_id = 11155111", "parent_chain_id = 1");
		let result = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&content);

		assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("not configured")));
	}

	#[test]
	fn test_rejects_bad_rpc_url() {
		let result = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&config_with_rpc("ws://sepolia.example.com"));

		assert!(matches!(result, Err(ConfigError::ValidationError(_))));
	}

	#[test]
	fn test_rejects_zero_cache_capacity() {
		let content = format!(
			"{}\n[cache]\nmax_entries = 0\n",
			config_with_rpc("https://sepolia.example.com")
		);
		let result = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&content);

		assert!(matches!(result, Err(ConfigError::ValidationError(_))));
	}

	#[test]
	fn test_rejects_refresh_within_retry_budget() {
		let content = config_with_rpc("https://sepolia.example.com").replace(
			"refresh_interval_secs = 15",
			"refresh_interval_secs = 8\n\t\t\tretry_count = 2\n\t\t\tretry_interval_secs = 5",
		);
		let result = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&content);
		assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("retry budget")));

		// Exactly the budget still leaves no room for the final attempt
		let content = content.replace("refresh_interval_secs = 8", "refresh_interval_secs = 10");
		let result = ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&content);
		assert!(matches!(result, Err(ConfigError::ValidationError(_))));

		let content = content.replace("refresh_interval_secs = 10", "refresh_interval_secs = 11");
		assert!(ConfigLoader::new()
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load_from_str(&content)
			.is_ok());
	}

	#[tokio::test]
	async fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(config_with_rpc("https://sepolia.example.com").as_bytes())
			.unwrap();

		let config = ConfigLoader::new()
			.with_file(file.path())
			.with_env_prefix("BRIDGE_TEST_UNSET_")
			.load()
			.await
			.unwrap();

		assert_eq!(config.chains.len(), 2);
	}

	#[tokio::test]
	async fn test_load_without_file() {
		let result = ConfigLoader::new().load().await;
		assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

		let result = ConfigLoader::new()
			.with_file("/nonexistent/bridge.toml")
			.load()
			.await;
		assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
	}
}
