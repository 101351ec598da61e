//! Continuously refreshed gas estimates for bridge transfers.
//!
//! Consumers call [`GasEstimationService::subscribe`] with a
//! [`GasEstimateRequest`] and read [`EstimateState`] values from the returned
//! [`GasEstimateSubscription`]. Nothing is estimated until a signer is
//! connected; after that the estimate refreshes on a fixed interval and
//! failed attempts are retried a bounded number of times.

use bridge_core::FactoryError;
use bridge_strategies::StrategyError;
use std::time::Duration;
use thiserror::Error;

pub mod request;
pub mod service;
pub mod signer;
pub mod subscription;

pub use request::{EstimateKey, GasEstimateRequest};
pub use service::GasEstimationService;
pub use signer::{signer_channel, SignerReceiver, SignerSender};
pub use subscription::{EstimateState, GasEstimateSubscription, SubscriptionClosed};

/// Failure surfaced to subscribers once retries are exhausted.
#[derive(Debug, Error)]
pub enum EstimationError {
	/// The route could not be resolved to a strategy.
	#[error(transparent)]
	Resolve(#[from] FactoryError),
	/// The strategy's gas estimation failed.
	#[error(transparent)]
	Strategy(#[from] StrategyError),
}

/// Refresh and retry timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimationConfig {
	/// Time between the starts of two estimation cycles
	pub refresh_interval: Duration,
	/// Extra attempts after a failed estimation
	pub retry_count: u32,
	/// Wait between attempts
	pub retry_interval: Duration,
}

impl Default for EstimationConfig {
	fn default() -> Self {
		Self {
			refresh_interval: Duration::from_secs(30),
			retry_count: 2,
			retry_interval: Duration::from_secs(5),
		}
	}
}
