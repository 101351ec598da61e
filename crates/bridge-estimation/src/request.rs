//! Estimation requests and their deduplication identity.

use bridge_types::{Adapters, Address, ChainId, Route, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a consumer wants estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimateRequest {
	pub route: Route,
	pub wallet_address: Option<Address>,
	pub amount: U256,
	pub adapters: Option<Adapters>,
}

impl GasEstimateRequest {
	pub fn new(route: Route, amount: U256) -> Self {
		Self {
			route,
			wallet_address: None,
			amount,
			adapters: None,
		}
	}

	pub fn with_wallet(mut self, wallet_address: Address) -> Self {
		self.wallet_address = Some(wallet_address);
		self
	}

	pub fn with_adapters(mut self, adapters: Adapters) -> Self {
		self.adapters = Some(adapters);
		self
	}

	pub fn key(&self) -> EstimateKey {
		EstimateKey::from(self)
	}
}

/// Identity under which concurrent subscriptions share one estimation.
///
/// Adapters are not part of it: subscriptions differing only in adapters
/// share the estimation started by the first of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EstimateKey {
	pub wallet_address: Option<Address>,
	pub source_chain_id: ChainId,
	pub destination_chain_id: ChainId,
	pub source_token_address: Option<Address>,
	pub destination_token_address: Option<Address>,
	/// Decimal form of the amount
	pub amount: String,
	pub discriminator: &'static str,
}

impl EstimateKey {
	pub const DISCRIMINATOR: &'static str = "gasEstimates";
}

impl From<&GasEstimateRequest> for EstimateKey {
	fn from(request: &GasEstimateRequest) -> Self {
		Self {
			wallet_address: request.wallet_address,
			source_chain_id: request.route.source_chain_id,
			destination_chain_id: request.route.destination_chain_id,
			source_token_address: request.route.source_token_address,
			destination_token_address: request.route.destination_token_address,
			amount: request.amount.to_string(),
			discriminator: Self::DISCRIMINATOR,
		}
	}
}

impl fmt::Display for EstimateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}:{}->{}",
			self.discriminator, self.source_chain_id, self.destination_chain_id
		)?;
		if let Some(token) = self.source_token_address {
			write!(f, ":{}", token)?;
		}
		write!(f, ":{}", self.amount)?;
		if let Some(wallet) = self.wallet_address {
			write!(f, "@{}", wallet)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request() -> GasEstimateRequest {
		GasEstimateRequest::new(
			Route::new(ChainId::ETHEREUM, ChainId::ARBITRUM_ONE),
			U256::from(1_000_000_000_000_000_000u128),
		)
	}

	#[test]
	fn test_amount_keyed_as_decimal() {
		let key = request().key();
		assert_eq!(key.amount, "1000000000000000000");
		assert_eq!(key.discriminator, "gasEstimates");
	}

	#[test]
	fn test_adapters_do_not_change_identity() {
		let with_adapters = request().with_adapters(Adapters {
			deposit: Some(Address::repeat_byte(0xad)),
			withdrawal: None,
		});
		assert_eq!(request().key(), with_adapters.key());
	}

	#[test]
	fn test_wallet_and_amount_change_identity() {
		let wallet = request().with_wallet(Address::repeat_byte(0x01));
		assert_ne!(request().key(), wallet.key());

		let mut other_amount = request();
		other_amount.amount += U256::from(1u64);
		assert_ne!(request().key(), other_amount.key());
	}

	#[test]
	fn test_key_display() {
		let key = request().with_wallet(Address::repeat_byte(0x01)).key();
		assert_eq!(
			key.to_string(),
			"gasEstimates:1->42161:1000000000000000000@0x0101010101010101010101010101010101010101"
		);
	}
}
