//! Route classifier.

use crate::support::SupportTable;
use bridge_types::{Adapters, Route, TransferCharacteristics, TransferDirection};
use std::sync::Arc;

/// Derives transfer characteristics from a route; adapters are accepted but
/// never change the outcome.
///
/// Classification has no side effects: the same route, adapters and support
/// table always produce the same characteristics.
#[derive(Clone)]
pub struct RouteClassifier {
	table: Arc<dyn SupportTable>,
}

impl RouteClassifier {
	pub fn new(table: Arc<dyn SupportTable>) -> Self {
		Self { table }
	}

	pub fn classify(&self, route: &Route, _adapters: Option<&Adapters>) -> TransferCharacteristics {
		let direction = self
			.table
			.direction(route.source_chain_id, route.destination_chain_id);
		let is_native_currency_transfer = route.is_native_currency_transfer();

		TransferCharacteristics {
			is_deposit: direction == Some(TransferDirection::Deposit),
			is_native_currency_transfer,
			is_supported: direction.is_some() && token_pairing_supported(route),
		}
	}
}

/// Token-side rules applied on top of the chain pair lookup.
///
/// Adapters never affect support. They only pick between token variants, and
/// a native currency transfer ignores them.
fn token_pairing_supported(route: &Route) -> bool {
	// The source token must be known to move a token
	!(route.destination_token_address.is_some() && route.source_token_address.is_none())
}
