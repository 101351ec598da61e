//! Deposit strategies: parent chain to child chain.
//!
//! Native-currency deposits go through the child chain's inbox. Token
//! deposits go through the parent gateway router, or through a custom
//! adapter when the token has one, and pay for a retryable ticket that
//! completes the transfer on the child chain.

use crate::contracts::{retryable_submission_fee, IInbox, IParentGatewayRouter};
use crate::{EstimateGasParams, StrategyError, StrategyInit, StrategySettings};
use alloy::sol_types::{SolCall, SolValue};
use bridge_types::{
	Address, Bytes, CallRequest, ChainProvider, DepositGasEstimates, GasEstimateResult, U256,
};
use std::sync::Arc;
use tracing::debug;

/// Native-currency deposit through the inbox.
pub struct NativeDepositStrategy {
	source: Arc<dyn ChainProvider>,
	destination: Arc<dyn ChainProvider>,
	inbox: Address,
}

impl NativeDepositStrategy {
	pub fn new(init: StrategyInit) -> Result<Self, StrategyError> {
		let bridge = init
			.destination_provider
			.bridge()
			.copied()
			.ok_or_else(|| {
				StrategyError::MissingBridgeContracts(init.destination_provider.chain_id())
			})?;

		Ok(Self {
			source: init.source_provider,
			destination: init.destination_provider,
			inbox: bridge.inbox,
		})
	}

	pub fn inbox(&self) -> Address {
		self.inbox
	}

	pub async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		let from = params.signer.address().await?;
		let call = CallRequest {
			from,
			to: self.inbox,
			value: params.amount,
			data: IInbox::depositEthCall {}.abi_encode().into(),
		};

		let parent_gas = self.source.estimate_gas(&call).await?;
		debug!(
			source = %self.source.chain_id(),
			destination = %self.destination.chain_id(),
			parent_gas,
			"Estimated native deposit"
		);

		// The deposited value is credited directly, no child chain execution
		Ok(GasEstimateResult::Deposit(DepositGasEstimates {
			estimated_parent_chain_gas: U256::from(parent_gas),
			estimated_child_chain_gas: U256::ZERO,
			estimated_child_chain_submission_cost: U256::ZERO,
		}))
	}
}

/// Shared body of the router and adapter token deposits.
struct TokenDeposit {
	source: Arc<dyn ChainProvider>,
	destination: Arc<dyn ChainProvider>,
	token: Address,
	gateway: Address,
	settings: StrategySettings,
}

impl TokenDeposit {
	fn new(init: StrategyInit, gateway: Address) -> Result<Self, StrategyError> {
		let token = init
			.source_token_address
			.ok_or(StrategyError::MissingTokenAddress("source"))?;

		Ok(Self {
			source: init.source_provider,
			destination: init.destination_provider,
			token,
			gateway,
			settings: init.settings,
		})
	}

	fn encode(
		&self,
		to: Address,
		amount: U256,
		max_gas: U256,
		gas_price_bid: U256,
		max_submission_cost: U256,
	) -> Vec<u8> {
		let extra = (max_submission_cost, Bytes::new()).abi_encode_params();
		IParentGatewayRouter::outboundTransferCall {
			_token: self.token,
			_to: to,
			_amount: amount,
			_maxGas: max_gas,
			_gasPriceBid: gas_price_bid,
			_data: extra.into(),
		}
		.abi_encode()
	}

	async fn estimate_gas(
		&self,
		params: &EstimateGasParams,
	) -> Result<GasEstimateResult, StrategyError> {
		let from = params.signer.address().await?;
		let parent_gas_price = self.source.gas_price().await?;
		let child_gas_price = U256::from(self.destination.gas_price().await?);
		let max_gas = U256::from(self.settings.retryable_gas_limit);

		// Calldata length does not depend on the submission cost value
		let sizing = self.encode(from, params.amount, max_gas, child_gas_price, U256::ZERO);
		let submission_cost = retryable_submission_fee(sizing.len(), parent_gas_price);
		let data = self.encode(from, params.amount, max_gas, child_gas_price, submission_cost);

		let call = CallRequest {
			from,
			to: self.gateway,
			value: submission_cost + max_gas * child_gas_price,
			data: data.into(),
		};

		let parent_gas = self.source.estimate_gas(&call).await?;
		debug!(
			source = %self.source.chain_id(),
			destination = %self.destination.chain_id(),
			token = %self.token,
			gateway = %self.gateway,
			parent_gas,
			%submission_cost,
			"Estimated token deposit"
		);

		Ok(GasEstimateResult::Deposit(DepositGasEstimates {
			estimated_parent_chain_gas: U256::from(parent_gas),
			estimated_child_chain_gas: max_gas,
			estimated_child_chain_submission_cost: submission_cost,
		}))
	}
}

/// Token deposit through the standard parent gateway router.
pub struct StandardTokenDepositStrategy(TokenDeposit);

impl StandardTokenDepositStrategy {
	pub fn new(init: StrategyInit) -> Result<Self, StrategyError> {
		let bridge = init
			.destination_provider
			.bridge()
			.copied()
			.ok_or_else(|| {
				StrategyError::MissingBridgeContracts(init.destination_provider.chain_id())
			})?;
		Ok(Self(TokenDeposit::new(init, bridge.parent_gateway_router)?))
	}

	pub fn token(&self) -> Address {
		self.0.token
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

/// Token deposit through the token's custom deposit adapter.
pub struct AdapterTokenDepositStrategy(TokenDeposit);

impl AdapterTokenDepositStrategy {
	pub fn new(init: StrategyInit) -> Result<Self, StrategyError> {
		let adapter = init
			.adapter(true)
			.ok_or(StrategyError::MissingAdapter("deposit"))?;
		Ok(Self(TokenDeposit::new(init, adapter)?))
	}

	pub fn token(&self) -> Address {
		self.0.token
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
