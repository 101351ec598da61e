//! Gas estimate results produced by transfer strategies.

use crate::U256;
use serde::{Deserialize, Serialize};

/// Gas estimates for a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimates {
	pub estimated_parent_chain_gas: U256,
	pub estimated_child_chain_gas: U256,
}

/// Gas estimates for a deposit, including the retryable submission cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositGasEstimates {
	pub estimated_parent_chain_gas: U256,
	pub estimated_child_chain_gas: U256,
	pub estimated_child_chain_submission_cost: U256,
}

/// Result of a strategy's gas estimation, shaped by transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GasEstimateResult {
	Gas(GasEstimates),
	Deposit(DepositGasEstimates),
}

impl GasEstimateResult {
	pub fn estimated_parent_chain_gas(&self) -> U256 {
		match self {
			Self::Gas(estimates) => estimates.estimated_parent_chain_gas,
			Self::Deposit(estimates) => estimates.estimated_parent_chain_gas,
		}
	}

	pub fn estimated_child_chain_gas(&self) -> U256 {
		match self {
			Self::Gas(estimates) => estimates.estimated_child_chain_gas,
			Self::Deposit(estimates) => estimates.estimated_child_chain_gas,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_accessors_cover_both_shapes() {
		let withdrawal = GasEstimateResult::Gas(GasEstimates {
			estimated_parent_chain_gas: U256::ZERO,
			estimated_child_chain_gas: U256::from(90_000u64),
		});
		assert_eq!(withdrawal.estimated_child_chain_gas(), U256::from(90_000u64));

		let deposit = GasEstimateResult::Deposit(DepositGasEstimates {
			estimated_parent_chain_gas: U256::from(120_000u64),
			estimated_child_chain_gas: U256::from(300_000u64),
			estimated_child_chain_submission_cost: U256::from(7u64),
		});
		assert_eq!(deposit.estimated_parent_chain_gas(), U256::from(120_000u64));
	}

	#[test]
	fn test_deposit_serializes_camel_case() {
		let deposit = GasEstimateResult::Deposit(DepositGasEstimates {
			estimated_parent_chain_gas: U256::from(1u64),
			estimated_child_chain_gas: U256::from(2u64),
			estimated_child_chain_submission_cost: U256::from(3u64),
		});
		let json = serde_json::to_value(deposit).unwrap();
		assert_eq!(json["kind"], "deposit");
		assert!(json.get("estimatedChildChainSubmissionCost").is_some());
	}
}
