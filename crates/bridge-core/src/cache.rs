//! Owned strategy cache with an injected size and age policy.

use bridge_strategies::TransferStrategy;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Bounds applied to a [`StrategyCache`].
///
/// The default keeps every entry for the lifetime of the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
	/// Maximum number of entries; the oldest entry is evicted beyond it.
	pub max_entries: Option<usize>,
	/// Age after which an entry is treated as absent.
	pub ttl: Option<Duration>,
}

impl CachePolicy {
	pub fn unbounded() -> Self {
		Self::default()
	}

	pub fn with_max_entries(mut self, max_entries: usize) -> Self {
		self.max_entries = Some(max_entries);
		self
	}

	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = Some(ttl);
		self
	}
}

struct CacheEntry<S> {
	value: Arc<S>,
	inserted_at: Instant,
	sequence: u64,
}

/// Outcome of [`StrategyCache::get_or_try_insert_with`].
#[derive(Debug)]
pub enum Lookup<S> {
	Hit(Arc<S>),
	Inserted(Arc<S>),
}

impl<S> Lookup<S> {
	pub fn into_inner(self) -> Arc<S> {
		match self {
			Self::Hit(value) | Self::Inserted(value) => value,
		}
	}

	pub fn is_hit(&self) -> bool {
		matches!(self, Self::Hit(_))
	}
}

/// Memoization table from route key to shared strategy.
///
/// At most one value exists per key at a time: the check for an existing
/// entry and the insertion of a new one happen under the same shard lock.
pub struct StrategyCache<S = TransferStrategy> {
	entries: DashMap<String, CacheEntry<S>>,
	policy: CachePolicy,
	next_sequence: AtomicU64,
}

impl<S> StrategyCache<S> {
	pub fn new(policy: CachePolicy) -> Self {
		Self {
			entries: DashMap::new(),
			policy,
			next_sequence: AtomicU64::new(0),
		}
	}

	pub fn policy(&self) -> CachePolicy {
		self.policy
	}

	/// Returns the live entry for `key`, if any.
	pub fn get(&self, key: &str) -> Option<Arc<S>> {
		let entry = self.entries.get(key)?;
		if self.is_expired(&entry, Instant::now()) {
			return None;
		}
		Some(entry.value.clone())
	}

	/// Returns the live entry for `key`, or builds and stores a new one.
	///
	/// `build` runs while the key's shard is locked, so it must not touch
	/// this cache. A failed build stores nothing.
	pub fn get_or_try_insert_with<E>(
		&self,
		key: &str,
		build: impl FnOnce() -> Result<Arc<S>, E>,
	) -> Result<Lookup<S>, E> {
		let now = Instant::now();

		let lookup = match self.entries.entry(key.to_string()) {
			Entry::Occupied(mut occupied) => {
				if !self.is_expired(occupied.get(), now) {
					return Ok(Lookup::Hit(occupied.get().value.clone()));
				}

				debug!("Cache entry {} expired, rebuilding", key);
				match build() {
					Ok(value) => {
						occupied.insert(self.new_entry(value.clone(), now));
						Lookup::Inserted(value)
					}
					Err(e) => {
						occupied.remove();
						return Err(e);
					}
				}
			}
			Entry::Vacant(vacant) => {
				let value = build()?;
				vacant.insert(self.new_entry(value.clone(), now));
				Lookup::Inserted(value)
			}
		};

		self.enforce_capacity();
		Ok(lookup)
	}

	pub fn remove(&self, key: &str) -> Option<Arc<S>> {
		self.entries.remove(key).map(|(_, entry)| entry.value)
	}

	pub fn clear(&self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn new_entry(&self, value: Arc<S>, inserted_at: Instant) -> CacheEntry<S> {
		CacheEntry {
			value,
			inserted_at,
			sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
		}
	}

	fn is_expired(&self, entry: &CacheEntry<S>, now: Instant) -> bool {
		self.policy
			.ttl
			.is_some_and(|ttl| now.duration_since(entry.inserted_at) >= ttl)
	}

	/// Evicts the oldest insertions until the cache fits `max_entries`.
	///
	/// Each eviction scans every shard for the lowest sequence, so its cost
	/// is linear in the number of cached strategies.
	fn enforce_capacity(&self) {
		let Some(max_entries) = self.policy.max_entries else {
			return;
		};

		while self.entries.len() > max_entries {
			let oldest = self
				.entries
				.iter()
				.min_by_key(|entry| entry.sequence)
				.map(|entry| entry.key().clone());

			match oldest {
				Some(key) => {
					debug!("Evicting cache entry {}", key);
					self.entries.remove(&key);
				}
				None => break,
			}
		}
	}
}
