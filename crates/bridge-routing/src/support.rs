//! Chain pair support table.

use bridge_types::{ChainId, TransferDirection};
use std::collections::HashMap;
use tracing::debug;

/// Source of truth for which chain pairs can be bridged, and in which direction.
pub trait SupportTable: Send + Sync {
	/// Direction of a transfer from `source` to `destination`, or `None`
	/// when the pair is not bridged directly.
	fn direction(&self, source: ChainId, destination: ChainId) -> Option<TransferDirection>;
}

/// Support table built from `(parent, child)` chain pairs.
#[derive(Debug, Clone, Default)]
pub struct ChainPairTable {
	/// Child chain to its parent
	parents: HashMap<ChainId, ChainId>,
}

impl ChainPairTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from `(parent, child)` pairs; self-pairs are ignored.
	pub fn from_pairs(pairs: impl IntoIterator<Item = (ChainId, ChainId)>) -> Self {
		let mut table = Self::new();
		for (parent, child) in pairs {
			table.insert(parent, child);
		}
		table
	}

	pub fn insert(&mut self, parent: ChainId, child: ChainId) {
		if parent == child {
			debug!("Ignoring self-referencing chain pair {}", parent);
			return;
		}
		debug!("Registering chain pair {} -> {}", parent, child);
		self.parents.insert(child, parent);
	}

	pub fn parent_of(&self, child: ChainId) -> Option<ChainId> {
		self.parents.get(&child).copied()
	}

	pub fn len(&self) -> usize {
		self.parents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parents.is_empty()
	}
}

impl SupportTable for ChainPairTable {
	fn direction(&self, source: ChainId, destination: ChainId) -> Option<TransferDirection> {
		if self.parent_of(destination) == Some(source) {
			Some(TransferDirection::Deposit)
		} else if self.parent_of(source) == Some(destination) {
			Some(TransferDirection::Withdrawal)
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> ChainPairTable {
		ChainPairTable::from_pairs([
			(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE),
			(ChainId::ETHEREUM, ChainId::ARBITRUM_NOVA),
			(ChainId::SEPOLIA, ChainId::ARBITRUM_SEPOLIA),
		])
	}

	#[test]
	fn test_directions() {
		let table = table();
		assert_eq!(
			table.direction(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE),
			Some(TransferDirection::Deposit)
		);
		assert_eq!(
			table.direction(ChainId::ARBITRUM_NOVA, ChainId::ETHEREUM),
			Some(TransferDirection::Withdrawal)
		);
	}

	#[test]
	fn test_unrelated_pairs_are_not_bridged() {
		let table = table();
		// Siblings share a parent but are not bridged directly
		assert_eq!(
			table.direction(ChainId::ARBITRUM_ONE, ChainId::ARBITRUM_NOVA),
			None
		);
		// Testnet child does not bridge to mainnet
		assert_eq!(
			table.direction(ChainId::ETHEREUM, ChainId::ARBITRUM_SEPOLIA),
			None
		);
		assert_eq!(table.direction(ChainId::ETHEREUM, ChainId::ETHEREUM), None);
		assert_eq!(table.direction(ChainId(999), ChainId(1000)), None);
	}

	#[test]
	fn test_self_pairs_ignored() {
		let table = ChainPairTable::from_pairs([(ChainId(5), ChainId(5))]);
		assert!(table.is_empty());
	}

	#[test]
	fn test_layered_rollups() {
		// An L3 settles to an L2 which settles to L1
		let table = ChainPairTable::from_pairs([
			(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE),
			(ChainId::ARBITRUM_ONE, ChainId(660279)),
		]);
		assert_eq!(table.len(), 2);
		assert_eq!(
			table.direction(ChainId::ARBITRUM_ONE, ChainId(660279)),
			Some(TransferDirection::Deposit)
		);
		assert_eq!(table.direction(ChainId::ETHEREUM, ChainId(660279)), None);
	}
}
