//! Variant selection table.

use bridge_strategies::StrategyKind;
use bridge_types::{Adapters, TransferCharacteristics};
use tracing::warn;

/// Picks the strategy variant for a supported route.
///
/// This is the single place where characteristics map to a variant; the
/// match is exhaustive so a new combination cannot fall through silently.
pub fn select_variant(
	characteristics: &TransferCharacteristics,
	adapters: Option<&Adapters>,
) -> StrategyKind {
	let adapter = adapters.and_then(|a| a.for_direction(characteristics.is_deposit));

	match (
		characteristics.is_deposit,
		characteristics.is_native_currency_transfer,
		adapter,
	) {
		(true, true, _) => StrategyKind::NativeDeposit,
		(true, false, Some(_)) => StrategyKind::AdapterTokenDeposit,
		(true, false, None) => StrategyKind::StandardTokenDeposit,
		(false, true, _) => StrategyKind::NativeWithdrawal,
		(false, false, None) => StrategyKind::StandardTokenWithdrawal,
		(false, false, Some(adapter)) => {
			// Adapter-aware withdrawals are not enabled yet
			warn!(
				%adapter,
				"Withdrawal adapters are not supported yet, using the standard gateway"
			);
			StrategyKind::StandardTokenWithdrawal
		}
	}
}
