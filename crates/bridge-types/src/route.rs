//! Transfer routes and the characteristics derived from them.
//!
//! A route names the two chains of a transfer and, for token transfers, the
//! token contract on either side. Absent addresses mean the chain's native
//! currency is moved.

use crate::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cross-chain transfer route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	pub source_chain_id: ChainId,
	pub destination_chain_id: ChainId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_token_address: Option<Address>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub destination_token_address: Option<Address>,
}

impl Route {
	/// Creates a native-currency route between two chains.
	pub fn new(source_chain_id: ChainId, destination_chain_id: ChainId) -> Self {
		Self {
			source_chain_id,
			destination_chain_id,
			source_token_address: None,
			destination_token_address: None,
		}
	}

	pub fn with_source_token(mut self, address: Address) -> Self {
		self.source_token_address = Some(address);
		self
	}

	pub fn with_destination_token(mut self, address: Address) -> Self {
		self.destination_token_address = Some(address);
		self
	}

	/// True when neither side names a token contract.
	pub fn is_native_currency_transfer(&self) -> bool {
		self.source_token_address.is_none() && self.destination_token_address.is_none()
	}
}

impl fmt::Display for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {}", self.source_chain_id, self.destination_chain_id)?;
		if let Some(token) = self.source_token_address {
			write!(f, " (token {})", token)?;
		}
		Ok(())
	}
}

/// Optional custom bridging contracts for a token, one per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapters {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deposit: Option<Address>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub withdrawal: Option<Address>,
}

impl Adapters {
	/// Returns the adapter used for the given direction, if any.
	pub fn for_direction(&self, is_deposit: bool) -> Option<Address> {
		if is_deposit {
			self.deposit
		} else {
			self.withdrawal
		}
	}

	pub fn is_empty(&self) -> bool {
		self.deposit.is_none() && self.withdrawal.is_none()
	}
}

/// Direction of a transfer between a parent chain and one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
	/// Parent chain to child chain.
	Deposit,
	/// Child chain back to its parent.
	Withdrawal,
}

/// Characteristics of a route, derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCharacteristics {
	pub is_deposit: bool,
	pub is_native_currency_transfer: bool,
	pub is_supported: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_native_route_has_no_tokens() {
		let route = Route::new(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE);
		assert!(route.is_native_currency_transfer());

		let token = Route::new(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE)
			.with_source_token(Address::repeat_byte(0x11));
		assert!(!token.is_native_currency_transfer());

		// A destination-only token still makes it a token transfer
		let odd = Route::new(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE)
			.with_destination_token(Address::repeat_byte(0x22));
		assert!(!odd.is_native_currency_transfer());
	}

	#[test]
	fn test_adapters_for_direction() {
		let adapters = Adapters {
			deposit: Some(Address::repeat_byte(0xaa)),
			withdrawal: None,
		};
		assert_eq!(adapters.for_direction(true), Some(Address::repeat_byte(0xaa)));
		assert_eq!(adapters.for_direction(false), None);
		assert!(!adapters.is_empty());
		assert!(Adapters::default().is_empty());
	}

	#[test]
	fn test_route_json_shape() {
		let route = Route::new(ChainId(1), ChainId(42161));
		let json = serde_json::to_value(route).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "sourceChainId": 1, "destinationChainId": 42161 })
		);
	}
}
