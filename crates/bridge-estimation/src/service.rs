//! Deduplicated, self-refreshing gas estimation.
//!
//! Every distinct [`EstimateKey`] is served by one driver task. The driver
//! waits for a signer, then runs an estimation cycle every refresh interval.
//! A cycle resolves the strategy and asks it for a gas estimate, retrying a
//! bounded number of times before it reports the failure. When the refresh
//! interval elapses while the first attempt of a cycle is still in flight,
//! the cycle is dropped and a new one starts in its place. A cycle that has
//! begun retrying is left to finish, and the refresh follows right after.

use crate::request::{EstimateKey, GasEstimateRequest};
use crate::signer::SignerReceiver;
use crate::subscription::{EstimateState, GasEstimateSubscription};
use crate::{EstimationConfig, EstimationError};
use backoff::backoff::{Backoff, Constant};
use bridge_core::StrategyFactory;
use bridge_strategies::EstimateGasParams;
use bridge_types::{GasEstimateResult, TransferSigner};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

type ActiveEstimates = DashMap<EstimateKey, Weak<SharedEstimate>>;

/// Entry point for consumers that want continuously refreshed estimates.
#[derive(Clone)]
pub struct GasEstimationService {
	factory: Arc<StrategyFactory>,
	signer: SignerReceiver,
	config: EstimationConfig,
	active: Arc<ActiveEstimates>,
}

impl GasEstimationService {
	pub fn new(
		factory: Arc<StrategyFactory>,
		signer: SignerReceiver,
		config: EstimationConfig,
	) -> Self {
		Self {
			factory,
			signer,
			config,
			active: Arc::new(DashMap::new()),
		}
	}

	/// Subscribes to estimates for `request`.
	///
	/// Joins the running driver for the same identity if there is one,
	/// otherwise spawns a new driver on the current tokio runtime.
	pub fn subscribe(&self, request: GasEstimateRequest) -> GasEstimateSubscription {
		let key = request.key();

		// Dropped only after the entry guard is released, its Drop touches the map
		let mut finished = None;

		let shared = match self.active.entry(key.clone()) {
			Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
				Some(shared) if !shared.is_finished() => {
					debug!(%key, "Joining running gas estimation");
					shared
				}
				stale => {
					if stale.is_some() {
						warn!(%key, "Gas estimation driver stopped, starting a new one");
					}
					finished = stale;
					let shared = self.start(key, request);
					occupied.insert(Arc::downgrade(&shared));
					shared
				}
			},
			Entry::Vacant(vacant) => {
				let shared = self.start(key, request);
				vacant.insert(Arc::downgrade(&shared));
				shared
			}
		};
		drop(finished);

		GasEstimateSubscription::new(shared)
	}

	/// Number of identities with a running driver.
	pub fn active_estimates(&self) -> usize {
		let handles: Vec<_> = self
			.active
			.iter()
			.filter_map(|entry| entry.value().upgrade())
			.collect();
		handles.iter().filter(|shared| !shared.is_finished()).count()
	}

	fn start(&self, key: EstimateKey, request: GasEstimateRequest) -> Arc<SharedEstimate> {
		info!(%key, "Starting gas estimation");

		let (state, receiver) = watch::channel(EstimateState::default());
		let driver = Driver {
			key: key.clone(),
			request,
			factory: self.factory.clone(),
			signer: self.signer.clone(),
			config: self.config,
			state,
			latest_generation: AtomicU64::new(0),
			retrying: AtomicBool::new(false),
		};

		Arc::new(SharedEstimate {
			key,
			receiver,
			task: tokio::spawn(driver.run()),
			active: self.active.clone(),
		})
	}
}

/// Driver task of one identity, shared by its subscriptions.
pub(crate) struct SharedEstimate {
	key: EstimateKey,
	receiver: watch::Receiver<EstimateState>,
	task: JoinHandle<()>,
	active: Arc<ActiveEstimates>,
}

impl SharedEstimate {
	pub(crate) fn receiver(&self) -> watch::Receiver<EstimateState> {
		self.receiver.clone()
	}

	fn is_finished(&self) -> bool {
		self.task.is_finished()
	}
}

impl Drop for SharedEstimate {
	fn drop(&mut self) {
		self.task.abort();
		// A new driver may already have taken the slot
		self.active
			.remove_if(&self.key, |_, weak| weak.strong_count() == 0);
		debug!(key = %self.key, "Stopped gas estimation");
	}
}

struct Driver {
	key: EstimateKey,
	request: GasEstimateRequest,
	factory: Arc<StrategyFactory>,
	signer: SignerReceiver,
	config: EstimationConfig,
	state: watch::Sender<EstimateState>,
	latest_generation: AtomicU64,
	retrying: AtomicBool,
}

impl Driver {
	async fn run(mut self) {
		let mut generation = 0;

		loop {
			let signer = self.signer.borrow_and_update().clone();
			let Some(signer) = signer else {
				self.park();
				signer_changed(&mut self.signer).await;
				continue;
			};

			generation += 1;
			self.latest_generation.store(generation, Ordering::SeqCst);
			self.retrying.store(false, Ordering::SeqCst);
			let deadline = Instant::now() + self.config.refresh_interval;

			let cycle = Cycle {
				key: &self.key,
				request: &self.request,
				factory: &self.factory,
				config: &self.config,
				state: &self.state,
				latest_generation: &self.latest_generation,
				retrying: &self.retrying,
				generation,
			};
			let running = cycle.run(signer);
			tokio::pin!(running);

			let mut refresh_due = false;
			loop {
				tokio::select! {
					_ = &mut running => {
						if refresh_due {
							break;
						}
						tokio::select! {
							_ = sleep_until(deadline) => {}
							_ = signer_changed(&mut self.signer) => {
								debug!(key = %self.key, "Signer changed, restarting estimation");
							}
						}
						break;
					}
					_ = sleep_until(deadline), if !refresh_due => {
						// A cycle that is retrying runs until it succeeds or reports its failure
						if self.retrying.load(Ordering::SeqCst) {
							debug!(key = %self.key, generation, "Refresh deferred until retries finish");
							refresh_due = true;
							continue;
						}
						debug!(key = %self.key, generation, "Refresh superseded a running estimation");
						break;
					}
					_ = signer_changed(&mut self.signer) => {
						debug!(key = %self.key, "Signer changed, restarting estimation");
						break;
					}
				}
			}
		}
	}

	/// Clears the visible state while no signer is connected.
	fn park(&self) {
		debug!(key = %self.key, "No signer connected, estimation idle");
		self.state.send_if_modified(|state| {
			if state.is_empty() {
				return false;
			}
			*state = EstimateState::default();
			true
		});
	}
}

/// Resolves once the signer changes.
///
/// Once the signer source is gone the last signer stays in place for good,
/// so this never resolves again.
async fn signer_changed(signer: &mut SignerReceiver) {
	if signer.changed().await.is_err() {
		std::future::pending::<()>().await;
	}
}

struct Cycle<'a> {
	key: &'a EstimateKey,
	request: &'a GasEstimateRequest,
	factory: &'a StrategyFactory,
	config: &'a EstimationConfig,
	state: &'a watch::Sender<EstimateState>,
	latest_generation: &'a AtomicU64,
	retrying: &'a AtomicBool,
	generation: u64,
}

impl Cycle<'_> {
	async fn run(self, signer: Arc<dyn TransferSigner>) {
		let mut backoff = Constant::new(self.config.retry_interval);
		let mut attempts = 0;

		loop {
			match self.estimate(signer.clone()).await {
				Ok(result) => {
					debug!(key = %self.key, generation = self.generation, "Gas estimation succeeded");
					self.publish(EstimateState {
						result: Some(result),
						error: None,
					});
					return;
				}
				Err(e) => {
					attempts += 1;

					if attempts > self.config.retry_count {
						warn!(
							key = %self.key,
							"Gas estimation failed after {} attempts: {}",
							attempts, e
						);
						self.publish(EstimateState {
							result: None,
							error: Some(Arc::new(e)),
						});
						return;
					}

					let delay = backoff.next_backoff().unwrap_or(self.config.retry_interval);
					warn!(
						key = %self.key,
						"Gas estimation failed, attempt {}/{}, retrying in {:?}: {}",
						attempts,
						self.config.retry_count + 1,
						delay,
						e
					);
					self.retrying.store(true, Ordering::SeqCst);
					sleep(delay).await;
				}
			}
		}
	}

	async fn estimate(
		&self,
		signer: Arc<dyn TransferSigner>,
	) -> Result<GasEstimateResult, EstimationError> {
		let strategy = self
			.factory
			.resolve(&self.request.route, self.request.adapters.as_ref())?;

		let params = EstimateGasParams {
			amount: self.request.amount,
			signer,
		};
		Ok(strategy.estimate_gas(&params).await?)
	}

	fn publish(&self, state: EstimateState) {
		if self.latest_generation.load(Ordering::SeqCst) != self.generation {
			debug!(key = %self.key, generation = self.generation, "Discarding stale estimate");
			return;
		}
		self.state.send_replace(state);
	}
}
