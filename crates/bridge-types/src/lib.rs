//! Shared types for the bridge transfer resolution system.
//!
//! Routes, adapters, gas estimate results and the narrow collaborator
//! traits (chain providers, provider lookup, signers) that the routing,
//! strategy, cache and estimation crates are written against.

pub mod account;
pub mod chains;
pub mod errors;
pub mod gas;
pub mod route;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use account::*;
pub use chains::*;
pub use errors::*;
pub use gas::*;
pub use route::*;

// Re-export commonly used ethereum primitives
pub use alloy::primitives::{Address, Bytes, U256};
