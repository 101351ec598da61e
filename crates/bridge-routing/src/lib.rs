//! Route classification for bridge transfers.
//!
//! Maps a route to its transfer characteristics (direction, custody model
//! and support status) using a table of recognised parent/child chain pairs.

pub mod classifier;
pub mod support;

pub use classifier::RouteClassifier;
pub use support::{ChainPairTable, SupportTable};
