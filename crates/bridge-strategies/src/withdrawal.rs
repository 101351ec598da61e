//! Withdrawal strategies: child chain back to its parent.
//!
//! Withdrawals are initiated on the child chain, so only child chain gas is
//! estimated. Completing them on the parent chain happens after the
//! challenge period and is not part of the estimate.

use crate::contracts::{IArbSys, IChildGatewayRouter, ARB_SYS};
use crate::{EstimateGasParams, StrategyError, StrategyInit};
use alloy::sol_types::SolCall;
use bridge_types::{
	Address, Bytes, CallRequest, ChainProvider, GasEstimateResult, GasEstimates, U256,
};
use std::sync::Arc;
use tracing::debug;

fn child_gas_only(child_gas: u64) -> GasEstimateResult {
	GasEstimateResult::Gas(GasEstimates {
		estimated_parent_chain_gas: U256::ZERO,
		estimated_child_chain_gas: U256::from(child_gas),
	})
}

/// Native-currency withdrawal through the ArbSys precompile.
pub struct NativeWithdrawalStrategy {
	source: Arc<dyn ChainProvider>,
}

impl NativeWithdrawalStrategy {
	pub fn new(init: StrategyInit) -> Self {
		Self {
			source: init.source_provider,
		}
	}

	pub async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		let from = params.signer.address().await?;
		let call = CallRequest {
			from,
			to: ARB_SYS,
			value: params.amount,
			data: IArbSys::withdrawEthCall { destination: from }.abi_encode().into(),
		};

		let child_gas = self.source.estimate_gas(&call).await?;
		debug!(source = %self.source.chain_id(), child_gas, "Estimated native withdrawal");

		Ok(child_gas_only(child_gas))
	}
}

/// Shared body of the router and adapter token withdrawals.
struct TokenWithdrawal {
	source: Arc<dyn ChainProvider>,
	parent_token: Address,
	gateway: Address,
}

impl TokenWithdrawal {
	fn new(init: StrategyInit, gateway: Address) -> Result<Self, StrategyError> {
		// The router is keyed by the token's parent chain address
		let parent_token = init
			.destination_token_address
			.ok_or(StrategyError::MissingTokenAddress("destination"))?;

		Ok(Self {
			source: init.source_provider,
			parent_token,
			gateway,
		})
	}

	async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		let from = params.signer.address().await?;
		let data = IChildGatewayRouter::outboundTransferCall {
			_l1Token: self.parent_token,
			_to: from,
			_amount: params.amount,
			_data: Bytes::new(),
		}
		.abi_encode();

		let call = CallRequest {
			from,
			to: self.gateway,
			value: U256::ZERO,
			data: data.into(),
		};

		let child_gas = self.source.estimate_gas(&call).await?;
		debug!(
			source = %self.source.chain_id(),
			token = %self.parent_token,
			gateway = %self.gateway,
			child_gas,
			"Estimated token withdrawal"
		);

		Ok(child_gas_only(child_gas))
	}
}

/// Token withdrawal through the standard child gateway router.
pub struct StandardTokenWithdrawalStrategy(TokenWithdrawal);

impl StandardTokenWithdrawalStrategy {
	pub fn new(init: StrategyInit) -> Result<Self, StrategyError> {
		let bridge = init
			.source_provider
			.bridge()
			.copied()
			.ok_or_else(|| StrategyError::MissingBridgeContracts(init.source_provider.chain_id()))?;
		Ok(Self(TokenWithdrawal::new(init, bridge.child_gateway_router)?))
	}

	pub fn parent_token(&self) -> Address {
		self.0.parent_token
	}

	pub fn gateway_router(&self) -> Address {
		self.0.gateway
	}

	pub async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		self.0.estimate_gas(params).await
	}
}

/// Token withdrawal through the token's custom withdrawal adapter.
pub struct AdapterTokenWithdrawalStrategy(TokenWithdrawal);

impl AdapterTokenWithdrawalStrategy {
	pub fn new(init: StrategyInit) -> Result<Self, StrategyError> {
		let adapter = init
			.adapter(false)
			.ok_or(StrategyError::MissingAdapter("withdrawal"))?;
		Ok(Self(TokenWithdrawal::new(init, adapter)?))
	}

	pub fn adapter(&self) -> Address {
		self.0.gateway
	}

	pub async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		self.0.estimate_gas(params).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::StrategySettings;
	use bridge_types::testing::{test_bridge_contracts, MockChainProvider, MockSigner};
	use bridge_types::{Adapters, ChainId};

	const SENDER: Address = Address::repeat_byte(0x5e);
	const PARENT_TOKEN: Address = Address::repeat_byte(0x70);

	fn child() -> Arc<MockChainProvider> {
		Arc::new(
			MockChainProvider::new(ChainId::ARBITRUM_ONE)
				.with_bridge(test_bridge_contracts())
				.with_gas_limit(700_000),
		)
	}

	fn init(
		source: Arc<MockChainProvider>,
		destination_token: Option<Address>,
		adapters: Option<Adapters>,
	) -> StrategyInit {
		StrategyInit {
			source_provider: source,
			destination_provider: Arc::new(MockChainProvider::new(ChainId::ETHEREUM)),
			source_token_address: destination_token.map(|_| Address::repeat_byte(0x71)),
			destination_token_address: destination_token,
			adapters,
			settings: StrategySettings::default(),
		}
	}

	fn params() -> EstimateGasParams {
		EstimateGasParams {
			amount: U256::from(42u64),
			signer: Arc::new(MockSigner(SENDER)),
		}
	}

	#[tokio::test]
	async fn test_native_withdrawal_calls_arbsys() {
		let source = child();
		let strategy = NativeWithdrawalStrategy::new(init(source.clone(), None, None));

		let result = strategy.estimate_gas(&params()).await.unwrap();
		assert_eq!(
			result,
			GasEstimateResult::Gas(GasEstimates {
				estimated_parent_chain_gas: U256::ZERO,
				estimated_child_chain_gas: U256::from(700_000u64),
			})
		);

		let call = &source.calls()[0];
		assert_eq!(call.to, ARB_SYS);
		assert_eq!(call.value, U256::from(42u64));
		let decoded = IArbSys::withdrawEthCall::abi_decode(&call.data).unwrap();
		assert_eq!(decoded.destination, SENDER);
	}

	#[tokio::test]
	async fn test_standard_token_withdrawal_uses_child_router() {
		let source = child();
		let strategy =
			StandardTokenWithdrawalStrategy::new(init(source.clone(), Some(PARENT_TOKEN), None))
				.unwrap();
		assert_eq!(strategy.parent_token(), PARENT_TOKEN);

		let result = strategy.estimate_gas(&params()).await.unwrap();
		assert_eq!(result.estimated_parent_chain_gas(), U256::ZERO);
		assert_eq!(result.estimated_child_chain_gas(), U256::from(700_000u64));

		let call = &source.calls()[0];
		assert_eq!(call.to, test_bridge_contracts().child_gateway_router);
		assert_eq!(call.value, U256::ZERO);
		let decoded = IChildGatewayRouter::outboundTransferCall::abi_decode(&call.data).unwrap();
		assert_eq!(decoded._l1Token, PARENT_TOKEN);
		assert_eq!(decoded._to, SENDER);
		assert_eq!(decoded._amount, U256::from(42u64));
	}

	#[test]
	fn test_token_withdrawal_requires_parent_token() {
		let result = StandardTokenWithdrawalStrategy::new(init(child(), None, None));
		assert!(matches!(
			result,
			Err(StrategyError::MissingTokenAddress("destination"))
		));
	}

	#[test]
	fn test_standard_withdrawal_requires_bridge() {
		let bare = Arc::new(MockChainProvider::new(ChainId(10)));
		let result = StandardTokenWithdrawalStrategy::new(init(bare, Some(PARENT_TOKEN), None));
		assert!(matches!(
			result,
			Err(StrategyError::MissingBridgeContracts(ChainId(10)))
		));
	}

	#[tokio::test]
	async fn test_adapter_withdrawal_targets_adapter() {
		let source = child();
		let adapter = Address::repeat_byte(0xae);
		let adapters = Adapters {
			deposit: Some(Address::repeat_byte(0xad)),
			withdrawal: Some(adapter),
		};
		let strategy = AdapterTokenWithdrawalStrategy::new(init(
			source.clone(),
			Some(PARENT_TOKEN),
			Some(adapters),
		))
		.unwrap();
		assert_eq!(strategy.adapter(), adapter);

		strategy.estimate_gas(&params()).await.unwrap();
		assert_eq!(source.calls()[0].to, adapter);
	}

	#[test]
	fn test_adapter_withdrawal_requires_adapter() {
		let deposit_only = Adapters {
			deposit: Some(Address::repeat_byte(0xad)),
			withdrawal: None,
		};
		let result =
			AdapterTokenWithdrawalStrategy::new(init(child(), Some(PARENT_TOKEN), Some(deposit_only)));
		assert!(matches!(
			result,
			Err(StrategyError::MissingAdapter("withdrawal"))
		));
	}
}
