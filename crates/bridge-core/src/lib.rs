//! Strategy resolution and caching.
//!
//! [`StrategyFactory::resolve`] classifies a route, rejects unsupported
//! ones, and hands out one shared [`TransferStrategy`] per route identity,
//! building it on first use with the providers of both chains.
//!
//! [`TransferStrategy`]: bridge_strategies::TransferStrategy

use bridge_strategies::StrategyError;
use bridge_types::ProviderError;
use thiserror::Error;

pub mod cache;
pub mod factory;
pub mod key;
pub mod selection;

pub use cache::{CachePolicy, StrategyCache};
pub use factory::{FactoryStats, StrategyFactory};
pub use key::cache_key;
pub use selection::select_variant;

/// Errors returned by [`StrategyFactory::resolve`].
#[derive(Debug, Error)]
pub enum FactoryError {
	/// The route or its token pairing is not bridged.
	#[error("Unsupported transfer: {route}")]
	UnsupportedTransfer { route: String },
	#[error(transparent)]
	Provider(#[from] ProviderError),
	#[error(transparent)]
	Construction(#[from] StrategyError),
}
