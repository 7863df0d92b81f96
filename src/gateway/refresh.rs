//! Single-flight credential refresh shared by every concurrently failing request.
//!
//! The first request to observe a 401 while no refresh is active installs a shared
//! [`RefreshOutcome`] cell and leads the refresh call; requests failing while it is
//! active await the same cell and never issue their own refresh. The check for "is a
//! refresh active" and the installation of a new cell happen under one mutex guard, so
//! two refreshes can never start concurrently, and the active-refresh state is cleared
//! before the outcome is published so a later 401 starts a fresh cycle. On a failed
//! refresh the leading task alone redirects the client to the login page.

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, routes},
	gateway::Gateway,
	http::GatewayTransport,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Settled outcome of a shared refresh operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// Credentials were renewed; failed requests may be replayed.
	Refreshed,
	/// The refresh call itself failed; the session is unrecoverable.
	Failed {
		/// HTTP status returned by the refresh endpoint, when one was received.
		status: Option<u16>,
	},
}
impl RefreshOutcome {
	/// True when the refresh succeeded.
	pub const fn is_refreshed(self) -> bool {
		matches!(self, RefreshOutcome::Refreshed)
	}
}

type SharedRefresh = Arc<AsyncOnceCell<RefreshOutcome>>;

/// Position a request takes relative to the active refresh.
pub(crate) enum Enlist {
	/// No refresh was active; this request installs the cell and performs the call.
	Lead(SharedRefresh),
	/// A refresh is already underway; this request awaits its outcome.
	Join(SharedRefresh),
}

/// Process-wide session state for the single-flight guarantee.
///
/// Holds at most one shared refresh cell at a time. All mutation goes through
/// [`enlist`](RefreshGate::enlist) and [`settle`](RefreshGate::settle), keeping the
/// check-and-create atomic.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate(Mutex<Option<SharedRefresh>>);
impl RefreshGate {
	/// Joins the active refresh, or installs a new cell and leads.
	pub(crate) fn enlist(&self) -> Enlist {
		let mut slot = self.0.lock();

		match &*slot {
			Some(shared) => Enlist::Join(shared.clone()),
			None => {
				let shared = SharedRefresh::default();

				*slot = Some(shared.clone());

				Enlist::Lead(shared)
			},
		}
	}

	/// Clears the active-refresh state.
	pub(crate) fn settle(&self) {
		*self.0.lock() = None;
	}

	/// True while a refresh cell is installed.
	pub(crate) fn is_active(&self) -> bool {
		self.0.lock().is_some()
	}
}

impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Suspends until the shared refresh settles, leading one if none is active.
	pub(crate) async fn await_refresh(&self) -> RefreshOutcome {
		const KIND: CallKind = CallKind::Refresh;

		match self.refresh_gate.enlist() {
			Enlist::Join(shared) => *shared.wait().await,
			Enlist::Lead(shared) => {
				let span = CallSpan::new(KIND, "await_refresh");

				obs::record_call_outcome(KIND, CallOutcome::Attempt);
				self.metrics.record_refresh_attempt();

				let outcome = span.instrument(self.refresh_credentials()).await;

				// Clear before publishing so a 401 arriving after this settle leads a
				// fresh cycle instead of observing a stale outcome.
				self.refresh_gate.settle();

				let _ = shared.set(outcome).await;

				if outcome.is_refreshed() {
					self.metrics.record_refresh_success();
					obs::record_call_outcome(KIND, CallOutcome::Success);
				} else {
					self.metrics.record_refresh_failure();
					obs::record_call_outcome(KIND, CallOutcome::Failure);
					// Leader-only, so a failed cycle navigates exactly once no matter
					// how many requests shared it.
					self.navigator.redirect(routes::LOGIN_PAGE);
				}

				outcome
			},
		}
	}

	/// Issues the credential-refresh call directly through the transport.
	///
	/// The call relies on ambient cookies, carries no body, and never re-enters the
	/// recovery path, so a 401 from the refresh endpoint cannot cascade.
	async fn refresh_credentials(&self) -> RefreshOutcome {
		let request = ApiRequest::get(routes::AUTH_REFRESH);

		match self.dispatch(&request).await {
			Ok(raw) if raw.is_success() => RefreshOutcome::Refreshed,
			Ok(raw) => RefreshOutcome::Failed { status: Some(raw.status) },
			Err(_) => RefreshOutcome::Failed { status: None },
		}
	}
}
