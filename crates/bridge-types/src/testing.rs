//! Test doubles for the collaborator traits.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the dev-dependencies of the crates built on top of it.

use crate::{
	Address, BridgeContracts, CallRequest, ChainId, ChainProvider, ProviderError,
	ProviderRegistry, SignerError, TransferSigner,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bridge contracts with recognisable placeholder addresses.
pub fn test_bridge_contracts() -> BridgeContracts {
	BridgeContracts {
		inbox: Address::repeat_byte(0x01),
		parent_gateway_router: Address::repeat_byte(0x02),
		child_gateway_router: Address::repeat_byte(0x03),
	}
}

/// Chain provider returning canned gas figures and recording every call.
pub struct MockChainProvider {
	chain_id: ChainId,
	bridge: Option<BridgeContracts>,
	gas_limit: u64,
	gas_price: u128,
	incrementing_gas: bool,
	failures_remaining: AtomicU32,
	delays: Mutex<VecDeque<Duration>>,
	calls: Mutex<Vec<CallRequest>>,
}

impl MockChainProvider {
	pub fn new(chain_id: ChainId) -> Self {
		Self {
			chain_id,
			bridge: None,
			gas_limit: 100_000,
			gas_price: 1_000_000_000,
			incrementing_gas: false,
			failures_remaining: AtomicU32::new(0),
			delays: Mutex::new(VecDeque::new()),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn with_bridge(mut self, bridge: BridgeContracts) -> Self {
		self.bridge = Some(bridge);
		self
	}

	pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = gas_limit;
		self
	}

	pub fn with_gas_price(mut self, gas_price: u128) -> Self {
		self.gas_price = gas_price;
		self
	}

	/// Each successive estimate returns one more unit of gas than the last.
	pub fn with_incrementing_gas(mut self) -> Self {
		self.incrementing_gas = true;
		self
	}

	/// Fails the next `times` estimation calls.
	pub fn failing_times(self, times: u32) -> Self {
		self.failures_remaining.store(times, Ordering::SeqCst);
		self
	}

	/// Fails the next `times` estimation calls, from the current call onwards.
	pub fn fail_next(&self, times: u32) {
		self.failures_remaining.store(times, Ordering::SeqCst);
	}

	/// Delays applied to successive estimation calls, in order.
	pub fn with_call_delays(self, delays: Vec<Duration>) -> Self {
		*self.delays.lock().unwrap() = delays.into();
		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap().len()
	}

	pub fn calls(&self) -> Vec<CallRequest> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl ChainProvider for MockChainProvider {
	fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	fn bridge(&self) -> Option<&BridgeContracts> {
		self.bridge.as_ref()
	}

	async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ProviderError> {
		let index = {
			let mut calls = self.calls.lock().unwrap();
			calls.push(call.clone());
			calls.len() as u64 - 1
		};

		let delay = self.delays.lock().unwrap().pop_front();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let failed = self
			.failures_remaining
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok();
		if failed {
			return Err(ProviderError::Rpc("mock estimation failure".to_string()));
		}

		if self.incrementing_gas {
			Ok(self.gas_limit + index)
		} else {
			Ok(self.gas_limit)
		}
	}

	async fn gas_price(&self) -> Result<u128, ProviderError> {
		Ok(self.gas_price)
	}
}

/// Provider registry over a fixed set of mocks, counting lookups.
#[derive(Default)]
pub struct MockProviderRegistry {
	providers: HashMap<ChainId, Arc<MockChainProvider>>,
	lookups: AtomicUsize,
}

impl MockProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_provider(mut self, provider: Arc<MockChainProvider>) -> Self {
		self.providers.insert(provider.chain_id(), provider);
		self
	}

	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

impl ProviderRegistry for MockProviderRegistry {
	fn provider(&self, chain_id: ChainId) -> Result<Arc<dyn ChainProvider>, ProviderError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		self.providers
			.get(&chain_id)
			.cloned()
			.map(|provider| provider as Arc<dyn ChainProvider>)
			.ok_or(ProviderError::UnknownChain(chain_id))
	}
}

/// Signer that always reports the same address.
pub struct MockSigner(pub Address);

#[async_trait]
impl TransferSigner for MockSigner {
	async fn address(&self) -> Result<Address, SignerError> {
		Ok(self.0)
	}
}
