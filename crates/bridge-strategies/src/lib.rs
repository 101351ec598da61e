//! Transfer strategies for bridging between parent and child chains.
//!
//! The set of strategies is closed: [`StrategyKind`] enumerates every
//! variant and [`TransferStrategy`] carries one payload per kind. Adding a
//! variant means extending both enums, and every `match` over them fails to
//! compile until the new variant is handled.
//!
//! Each payload owns the provider handles and addresses it needs to build
//! its bridge call and estimate the gas for it.

use bridge_types::{
	Adapters, Address, ChainId, ChainProvider, GasEstimateResult, ProviderError, SignerError,
	TransferSigner, U256,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub mod contracts;
pub mod deposit;
pub mod withdrawal;

pub use deposit::{AdapterTokenDepositStrategy, NativeDepositStrategy, StandardTokenDepositStrategy};
pub use withdrawal::{
	AdapterTokenWithdrawalStrategy, NativeWithdrawalStrategy, StandardTokenWithdrawalStrategy,
};

/// Errors that can occur while building or running a strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
	/// A token transfer is missing the token contract it needs.
	#[error("Missing {0} chain token address")]
	MissingTokenAddress(&'static str),
	/// An adapter strategy was built without its adapter.
	#[error("Missing {0} adapter")]
	MissingAdapter(&'static str),
	/// The child chain has no bridge contracts configured.
	#[error("No bridge contracts configured for chain {0}")]
	MissingBridgeContracts(ChainId),
	#[error(transparent)]
	Provider(#[from] ProviderError),
	#[error(transparent)]
	Signer(#[from] SignerError),
}

/// Every transfer variant the system knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
	NativeDeposit,
	StandardTokenDeposit,
	AdapterTokenDeposit,
	NativeWithdrawal,
	StandardTokenWithdrawal,
	AdapterTokenWithdrawal,
}

impl StrategyKind {
	pub const ALL: [StrategyKind; 6] = [
		StrategyKind::NativeDeposit,
		StrategyKind::StandardTokenDeposit,
		StrategyKind::AdapterTokenDeposit,
		StrategyKind::NativeWithdrawal,
		StrategyKind::StandardTokenWithdrawal,
		StrategyKind::AdapterTokenWithdrawal,
	];

	pub fn is_deposit(&self) -> bool {
		match self {
			Self::NativeDeposit | Self::StandardTokenDeposit | Self::AdapterTokenDeposit => true,
			Self::NativeWithdrawal | Self::StandardTokenWithdrawal | Self::AdapterTokenWithdrawal => {
				false
			}
		}
	}

	pub fn is_native_currency(&self) -> bool {
		matches!(self, Self::NativeDeposit | Self::NativeWithdrawal)
	}

	pub fn uses_adapter(&self) -> bool {
		matches!(self, Self::AdapterTokenDeposit | Self::AdapterTokenWithdrawal)
	}
}

impl fmt::Display for StrategyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::NativeDeposit => "NativeDeposit",
			Self::StandardTokenDeposit => "StandardTokenDeposit",
			Self::AdapterTokenDeposit => "AdapterTokenDeposit",
			Self::NativeWithdrawal => "NativeWithdrawal",
			Self::StandardTokenWithdrawal => "StandardTokenWithdrawal",
			Self::AdapterTokenWithdrawal => "AdapterTokenWithdrawal",
		};
		f.write_str(name)
	}
}

/// Parameters shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySettings {
	/// Gas limit reserved for executing a token deposit's retryable ticket.
	pub retryable_gas_limit: u64,
}

impl Default for StrategySettings {
	fn default() -> Self {
		Self {
			retryable_gas_limit: 300_000,
		}
	}
}

/// Everything a strategy constructor receives.
#[derive(Clone)]
pub struct StrategyInit {
	pub source_provider: Arc<dyn ChainProvider>,
	pub destination_provider: Arc<dyn ChainProvider>,
	pub source_token_address: Option<Address>,
	pub destination_token_address: Option<Address>,
	pub adapters: Option<Adapters>,
	pub settings: StrategySettings,
}

impl StrategyInit {
	fn adapter(&self, is_deposit: bool) -> Option<Address> {
		self.adapters.and_then(|adapters| adapters.for_direction(is_deposit))
	}
}

/// Input of a gas estimation.
#[derive(Clone)]
pub struct EstimateGasParams {
	pub amount: U256,
	pub signer: Arc<dyn TransferSigner>,
}

/// A resolved transfer strategy.
pub enum TransferStrategy {
	NativeDeposit(NativeDepositStrategy),
	StandardTokenDeposit(StandardTokenDepositStrategy),
	AdapterTokenDeposit(AdapterTokenDepositStrategy),
	NativeWithdrawal(NativeWithdrawalStrategy),
	StandardTokenWithdrawal(StandardTokenWithdrawalStrategy),
	AdapterTokenWithdrawal(AdapterTokenWithdrawalStrategy),
}

impl TransferStrategy {
	/// Constructs the strategy of the given kind.
	pub fn build(kind: StrategyKind, init: StrategyInit) -> Result<Self, StrategyError> {
		let strategy = match kind {
			StrategyKind::NativeDeposit => Self::NativeDeposit(NativeDepositStrategy::new(init)?),
			StrategyKind::StandardTokenDeposit => {
				Self::StandardTokenDeposit(StandardTokenDepositStrategy::new(init)?)
			}
			StrategyKind::AdapterTokenDeposit => {
				Self::AdapterTokenDeposit(AdapterTokenDepositStrategy::new(init)?)
			}
			StrategyKind::NativeWithdrawal => {
				Self::NativeWithdrawal(NativeWithdrawalStrategy::new(init))
			}
			StrategyKind::StandardTokenWithdrawal => {
				Self::StandardTokenWithdrawal(StandardTokenWithdrawalStrategy::new(init)?)
			}
			StrategyKind::AdapterTokenWithdrawal => {
				Self::AdapterTokenWithdrawal(AdapterTokenWithdrawalStrategy::new(init)?)
			}
		};
		Ok(strategy)
	}

	pub fn kind(&self) -> StrategyKind {
		match self {
			Self::NativeDeposit(_) => StrategyKind::NativeDeposit,
			Self::StandardTokenDeposit(_) => StrategyKind::StandardTokenDeposit,
			Self::AdapterTokenDeposit(_) => StrategyKind::AdapterTokenDeposit,
			Self::NativeWithdrawal(_) => StrategyKind::NativeWithdrawal,
			Self::StandardTokenWithdrawal(_) => StrategyKind::StandardTokenWithdrawal,
			Self::AdapterTokenWithdrawal(_) => StrategyKind::AdapterTokenWithdrawal,
		}
	}

	/// Estimates the gas needed to perform this transfer.
	pub async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		match self {
			Self::NativeDeposit(s) => s.estimate_gas(params).await,
			Self::StandardTokenDeposit(s) => s.estimate_gas(params).await,
			Self::AdapterTokenDeposit(s) => s.estimate_gas(params).await,
			Self::NativeWithdrawal(s) => s.estimate_gas(params).await,
			Self::StandardTokenWithdrawal(s) => s.estimate_gas(params).await,
			Self::AdapterTokenWithdrawal(s) => s.estimate_gas(params).await,
		}
	}
}

impl fmt::Debug for TransferStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TransferStrategy").field(&self.kind()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bridge_types::testing::{test_bridge_contracts, MockChainProvider};

	fn init(source_token: Option<Address>, destination_token: Option<Address>) -> StrategyInit {
		StrategyInit {
			source_provider: Arc::new(MockChainProvider::new(ChainId::ETHEREUM)),
			destination_provider: Arc::new(
				MockChainProvider::new(ChainId::ARBITRUM_ONE).with_bridge(test_bridge_contracts()),
			),
			source_token_address: source_token,
			destination_token_address: destination_token,
			adapters: Some(Adapters {
				deposit: Some(Address::repeat_byte(0xad)),
				withdrawal: Some(Address::repeat_byte(0xae)),
			}),
			settings: StrategySettings::default(),
		}
	}

	#[test]
	fn test_kind_predicates() {
		let deposits: Vec<_> = StrategyKind::ALL.iter().filter(|k| k.is_deposit()).collect();
		assert_eq!(deposits.len(), 3);
		assert!(StrategyKind::NativeWithdrawal.is_native_currency());
		assert!(!StrategyKind::StandardTokenDeposit.uses_adapter());
		assert!(StrategyKind::AdapterTokenWithdrawal.uses_adapter());
		assert_eq!(StrategyKind::AdapterTokenDeposit.to_string(), "AdapterTokenDeposit");
	}

	#[test]
	fn test_build_reports_its_kind() {
		let token = Some(Address::repeat_byte(0x11));
		for kind in [
			StrategyKind::NativeDeposit,
			StrategyKind::StandardTokenDeposit,
			StrategyKind::AdapterTokenDeposit,
		] {
			let strategy = TransferStrategy::build(kind, init(token, None)).unwrap();
			assert_eq!(strategy.kind(), kind);
		}
	}

	#[test]
	fn test_build_fails_without_token() {
		let result = TransferStrategy::build(StrategyKind::StandardTokenDeposit, init(None, None));
		assert!(matches!(
			result,
			Err(StrategyError::MissingTokenAddress("source"))
		));
	}
}
