//! Consumer handle on a shared estimation.

use crate::service::SharedEstimate;
use crate::EstimationError;
use bridge_types::GasEstimateResult;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

/// Latest outcome visible to subscribers.
///
/// Both fields are empty while no signer is connected or before the first
/// estimation completes.
#[derive(Debug, Clone, Default)]
pub struct EstimateState {
	pub result: Option<GasEstimateResult>,
	pub error: Option<Arc<EstimationError>>,
}

impl EstimateState {
	pub fn is_empty(&self) -> bool {
		self.result.is_none() && self.error.is_none()
	}
}

/// The estimation driver behind a subscription has stopped.
#[derive(Debug, Error)]
#[error("Gas estimation stopped")]
pub struct SubscriptionClosed;

/// Handle returned by [`GasEstimationService::subscribe`].
///
/// Subscriptions with the same identity share one driver. Dropping the last
/// of them stops it, cancelling any estimation still in flight.
///
/// [`GasEstimationService::subscribe`]: crate::GasEstimationService::subscribe
pub struct GasEstimateSubscription {
	receiver: watch::Receiver<EstimateState>,
	shared: Arc<SharedEstimate>,
}

impl GasEstimateSubscription {
	pub(crate) fn new(shared: Arc<SharedEstimate>) -> Self {
		// `changed` waits for the next update, not the state found on joining
		let mut receiver = shared.receiver();
		receiver.mark_unchanged();
		Self { receiver, shared }
	}

	/// Current state, without waiting.
	pub fn state(&self) -> EstimateState {
		self.receiver.borrow().clone()
	}

	/// Waits until the state changes after it was last observed.
	pub async fn changed(&mut self) -> Result<EstimateState, SubscriptionClosed> {
		self.receiver
			.changed()
			.await
			.map_err(|_| SubscriptionClosed)?;
		Ok(self.receiver.borrow_and_update().clone())
	}

	/// Waits until the state satisfies `predicate`, checking the current one first.
	pub async fn wait_for(
		&mut self,
		predicate: impl FnMut(&EstimateState) -> bool,
	) -> Result<EstimateState, SubscriptionClosed> {
		let state = self
			.receiver
			.wait_for(predicate)
			.await
			.map_err(|_| SubscriptionClosed)?;
		Ok(state.clone())
	}

	/// Stream of states, starting with the current one.
	pub fn into_stream(self) -> impl Stream<Item = EstimateState> + Send + 'static {
		let shared = self.shared;
		WatchStream::new(self.receiver).map(move |state| {
			// Keeps the driver running for as long as the stream lives
			let _driver = &shared;
			state
		})
	}
}
