//! Authenticated request gateway for the TeamTact remote API.
//!
//! [`Gateway::send`] dispatches a call, transparently recovers from a first-time HTTP
//! 401 by coordinating a single shared credential refresh (see [`refresh`]), replays the
//! failed request exactly once, and applies a uniform policy to every other response:
//! 5xx propagates as [`Error::Server`], transport failures propagate as
//! [`Error::Transport`], and everything else resolves to the caller as an
//! [`ApiResponse`] whose envelope carries the success flag.

pub mod refresh;

mod metrics;

pub use metrics::GatewayMetrics;
pub use refresh::RefreshOutcome;

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, ApiResponse, server_error_message},
	error::ConfigError,
	gateway::refresh::RefreshGate,
	http::{GatewayTransport, OutboundCall, RawResponse},
	nav::{Navigator, NoopNavigator},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport stack.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Coordinates authenticated calls against the TeamTact remote API.
///
/// The gateway owns the transport, the navigation seam, the session store, and the
/// single-flight refresh state so the endpoint bindings can focus on paths and
/// payloads. Cloning a gateway shares all of that state, so clones observe the same
/// in-flight refresh.
#[derive(Clone)]
pub struct Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// HTTP transport used for every outbound call.
	pub transport: Arc<T>,
	/// Base URL all request paths are joined onto.
	pub base_url: Url,
	/// Navigation sink for the redirect-to-login side effect.
	pub navigator: Arc<dyn Navigator>,
	/// Session store written by the auth endpoint bindings.
	pub session: Arc<SessionStore>,
	/// Shared counters for request and refresh outcomes.
	pub metrics: Arc<GatewayMetrics>,
	refresh_gate: Arc<RefreshGate>,
}
impl<T> Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_transport(base_url: Url, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			base_url,
			navigator: Arc::new(NoopNavigator),
			session: Default::default(),
			metrics: Default::default(),
			refresh_gate: Default::default(),
		}
	}

	/// Sets or replaces the navigation sink.
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = navigator;

		self
	}

	/// Shares an existing session store with this gateway.
	pub fn with_session(mut self, session: Arc<SessionStore>) -> Self {
		self.session = session;

		self
	}

	/// True while a credential refresh is underway.
	pub fn refresh_in_flight(&self) -> bool {
		self.refresh_gate.is_active()
	}

	/// Dispatches `request`, recovering at most once from an expired credential.
	///
	/// A first-time 401 marks the request retried, awaits the shared refresh outcome
	/// (leading a new refresh only when none is active), and replays on success. A 401
	/// on an already-retried request resolves to the caller as a non-success response;
	/// no further recovery is attempted.
	pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.metrics.record_request();

				let first = self.dispatch(&request).await?;

				if !first.is_unauthorized() || request.retried() {
					return self.resolve(first);
				}

				request.mark_retried();

				match self.await_refresh().await {
					RefreshOutcome::Refreshed => {
						self.metrics.record_replay();

						let replay = self.dispatch(&request).await?;

						self.resolve(replay)
					},
					RefreshOutcome::Failed { status } => Err(Error::AuthRecovery { status }),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	pub(crate) async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse> {
		let url = self.base_url.join(&request.path).map_err(|source| ConfigError::InvalidPath {
			path: request.path.clone(),
			source,
		})?;
		let call =
			OutboundCall { method: request.method, url, body: request.body.clone() };

		Ok(self.transport.execute(call).await?)
	}

	fn resolve(&self, raw: RawResponse) -> Result<ApiResponse> {
		let _span = CallSpan::new(CallKind::Request, "resolve").entered();

		if raw.is_server_error() {
			return Err(Error::Server {
				status: raw.status,
				message: server_error_message(&raw.body),
			});
		}

		Ok(ApiResponse::from_body(raw.status, &raw.body))
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a gateway with the crate's default cookie-enabled reqwest transport.
	pub fn new(base_url: Url) -> Result<Self> {
		Ok(Self::with_transport(base_url, ReqwestTransport::new()?))
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("base_url", &self.base_url.as_str())
			.field("refresh_in_flight", &self.refresh_in_flight())
			.finish()
	}
}
