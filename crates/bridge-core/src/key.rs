//! Route identity used to key the strategy cache.

use bridge_types::Route;
use std::fmt::Write;

/// Builds the cache key of a route.
///
/// Only the four route fields take part; adapters never do, so every
/// resolution of the same route shares one cached strategy.
pub fn cache_key(route: &Route) -> String {
	let mut key = format!(
		"source:{}-destination:{}",
		route.source_chain_id, route.destination_chain_id
	);
	if let Some(address) = route.source_token_address {
		let _ = write!(key, "-sourceErc20:{}", address);
	}
	if let Some(address) = route.destination_token_address {
		let _ = write!(key, "-destinationErc20:{}", address);
	}
	key
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::{Address, ChainId};

	#[test]
	fn test_native_route_key() {
		let route = Route::new(ChainId(1), ChainId(2));
		assert_eq!(cache_key(&route), "source:1-destination:2");
	}

	#[test]
	fn test_token_suffixes_in_fixed_order() {
		let source = Address::repeat_byte(0x11);
		let destination = Address::repeat_byte(0x22);

		let route = Route::new(ChainId(1), ChainId(2)).with_source_token(source);
		assert_eq!(
			cache_key(&route),
			"source:1-destination:2-sourceErc20:0x1111111111111111111111111111111111111111"
		);

		let route = route.with_destination_token(destination);
		assert_eq!(
			cache_key(&route),
			"source:1-destination:2\
			-sourceErc20:0x1111111111111111111111111111111111111111\
			-destinationErc20:0x2222222222222222222222222222222222222222"
		);
	}

	#[test]
	fn test_address_case_does_not_change_key() {
		let lower: Address = "0xaf88d065e77c8cc2239327c5edb3a432268e5831".parse().unwrap();
		let mixed: Address = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831".parse().unwrap();

		let a = Route::new(ChainId(1), ChainId(42161)).with_source_token(lower);
		let b = Route::new(ChainId(1), ChainId(42161)).with_source_token(mixed);
		assert_eq!(cache_key(&a), cache_key(&b));
	}
}
