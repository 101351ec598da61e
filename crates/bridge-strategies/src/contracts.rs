//! Bridge contract interfaces and fee formulas.

use alloy::primitives::{address, Address, U256};

alloy::sol! {
	interface IInbox {
		function depositEth() external payable returns (uint256);
	}

	interface IParentGatewayRouter {
		function outboundTransfer(
			address _token,
			address _to,
			uint256 _amount,
			uint256 _maxGas,
			uint256 _gasPriceBid,
			bytes _data
		) external payable returns (bytes);
	}

	interface IChildGatewayRouter {
		function outboundTransfer(
			address _l1Token,
			address _to,
			uint256 _amount,
			bytes _data
		) external payable returns (bytes);
	}

	interface IArbSys {
		function withdrawEth(address destination) external payable returns (uint256);
	}
}

/// ArbSys precompile, present at the same address on every child chain.
pub const ARB_SYS: Address = address!("0000000000000000000000000000000000000064");

/// Parent-chain fee for submitting a retryable ticket carrying `data_len` bytes.
pub fn retryable_submission_fee(data_len: usize, parent_gas_price: u128) -> U256 {
	U256::from(1400u64 + 6 * data_len as u64) * U256::from(parent_gas_price)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_submission_fee_formula() {
		assert_eq!(retryable_submission_fee(0, 10), U256::from(14_000u64));
		assert_eq!(retryable_submission_fee(100, 2), U256::from(4_000u64));
	}
}
