// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for gateway activity.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
	requests: AtomicU64,
	replays: AtomicU64,
	refresh_attempts: AtomicU64,
	refresh_success: AtomicU64,
	refresh_failure: AtomicU64,
}
impl GatewayMetrics {
	/// Returns the total number of requests entering the gateway.
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of requests replayed after a successful refresh.
	pub fn replays(&self) -> u64 {
		self.replays.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls actually issued to the remote API.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful refresh calls.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed refresh calls.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_replay(&self) {
		self.replays.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failure.fetch_add(1, Ordering::Relaxed);
	}
}
