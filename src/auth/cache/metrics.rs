// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

#[derive(Clone, Copy, Debug)]
pub(crate) enum CacheEvent {
	Hit,
	Miss,
	Acquired,
	Failed,
}

/// Lock-free counters describing how one token cache served its callers.
#[derive(Debug, Default)]
pub struct AcquisitionMetrics {
	hits: AtomicU64,
	misses: AtomicU64,
	acquired: AtomicU64,
	failed: AtomicU64,
}
impl AcquisitionMetrics {
	/// Captures the current counter values.
	pub fn snapshot(&self) -> AcquisitionStats {
		let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

		AcquisitionStats {
			cache_hits: load(&self.hits),
			cache_misses: load(&self.misses),
			acquisitions: load(&self.acquired) + load(&self.failed),
			failures: load(&self.failed),
		}
	}

	pub(crate) fn record(&self, event: CacheEvent) {
		let counter = match event {
			CacheEvent::Hit => &self.hits,
			CacheEvent::Miss => &self.misses,
			CacheEvent::Acquired => &self.acquired,
			CacheEvent::Failed => &self.failed,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

/// Point-in-time view of [`AcquisitionMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionStats {
	/// Calls answered from a fresh cached token.
	pub cache_hits: u64,
	/// Calls that had to wait on an acquisition, whether they drove it or joined it.
	pub cache_misses: u64,
	/// Token endpoint round trips that settled.
	pub acquisitions: u64,
	/// Round trips that ended in an error.
	pub failures: u64,
}
