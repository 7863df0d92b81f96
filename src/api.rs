//! Remote API surface: route table, response envelope, and typed endpoint bindings.

pub mod auth;
pub mod teams;

pub use auth::*;
pub use teams::*;

// self
use crate::{_prelude::*, http::Method};

/// Route table for the TeamTact remote API.
///
/// Endpoint paths are relative to the gateway's base URL; page paths (currently only
/// [`LOGIN_PAGE`](routes::LOGIN_PAGE)) are absolute within the host application.
pub mod routes {
	/// Login endpoint.
	pub const AUTH_LOGIN: &str = "auth/login";
	/// Registration endpoint.
	pub const AUTH_SIGNUP: &str = "auth/signup";
	/// Credential refresh endpoint; called with no body, ambient cookies only.
	pub const AUTH_REFRESH: &str = "auth/refresh";
	/// Password-reset request endpoint.
	pub const AUTH_REQUEST_RESET_PASSWORD: &str = "auth/request-reset-password";
	/// Password-reset token validation endpoint.
	pub const AUTH_VALIDATE_RESET_PASSWORD_TOKEN: &str = "auth/validate-reset-password-token";
	/// Password-reset confirmation endpoint.
	pub const AUTH_CONFIRM_RESET_PASSWORD: &str = "auth/confirm-reset-password";
	/// Email verification endpoint.
	pub const AUTH_VERIFY_EMAIL: &str = "auth/verify-email";
	/// Verification-email resend endpoint.
	pub const AUTH_RESEND_VERIFICATION_EMAIL: &str = "auth/resend-verification-email";
	/// Logout endpoint.
	pub const AUTH_LOGOUT: &str = "auth/logout";
	/// Team list/create endpoint.
	pub const TEAMS: &str = "teams/";
	/// Team-code autogeneration endpoint.
	pub const TEAMS_AUTOGENERATE_CODE: &str = "teams/autogenerate-code";
	/// Team-code validation endpoint.
	pub const TEAMS_VALIDATE_CODE: &str = "teams/validate-code";
	/// Invitation endpoint.
	pub const TEAMS_INVITE: &str = "teams/invite";
	/// Invitation acceptance endpoint; the token arrives as a query parameter.
	pub const TEAMS_ACCEPT_INVITE: &str = "teams/accept-invite";

	/// Login page the client is sent to after an unrecoverable authorization failure.
	pub const LOGIN_PAGE: &str = "/login";

	/// Returns the path for a single team.
	pub fn team(team_id: &str) -> String {
		format!("teams/{team_id}")
	}

	/// Returns the members path for a team.
	pub fn team_members(team_id: &str) -> String {
		format!("teams/{team_id}/members")
	}

	/// Returns the invitation-acceptance path carrying `team_code`.
	pub fn accept_invite(team_code: &str) -> String {
		format!("{TEAMS_ACCEPT_INVITE}?team_code={team_code}")
	}
}

/// Outbound call descriptor accepted by [`Gateway::send`](crate::gateway::Gateway::send).
///
/// Created per call and discarded after completion or final failure. The retry marker is
/// private to the crate: the gateway sets it before replaying so no request can trigger
/// more than one refresh cycle.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method for the call.
	pub method: Method,
	/// Path relative to the gateway's base URL.
	pub path: String,
	/// JSON body, when the call carries one.
	pub body: Option<JsonValue>,
	retried: bool,
}
impl ApiRequest {
	/// Builds a GET request for `path`.
	pub fn get(path: impl Into<String>) -> Self {
		Self { method: Method::Get, path: path.into(), body: None, retried: false }
	}

	/// Builds a bodyless POST request for `path`.
	pub fn post(path: impl Into<String>) -> Self {
		Self { method: Method::Post, path: path.into(), body: None, retried: false }
	}

	/// Builds a POST request for `path` carrying `body` as JSON.
	pub fn post_json(path: impl Into<String>, body: &impl Serialize) -> Result<Self> {
		let body = serde_json::to_value(body).map_err(crate::error::ConfigError::from)?;

		Ok(Self { method: Method::Post, path: path.into(), body: Some(body), retried: false })
	}

	/// Builds a DELETE request for `path`.
	pub fn delete(path: impl Into<String>) -> Self {
		Self { method: Method::Delete, path: path.into(), body: None, retried: false }
	}

	pub(crate) const fn retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}
}

/// Response envelope shared by every TeamTact endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
	/// Whether the remote operation succeeded; callers branch on this for toasts.
	#[serde(default)]
	pub success: bool,
	/// Human-readable message accompanying the outcome.
	#[serde(default)]
	pub message: Option<String>,
	/// Endpoint-specific payload.
	#[serde(default)]
	pub data: Option<JsonValue>,
}

/// Resolved response returned by the gateway.
///
/// Both success and expected-failure (4xx) responses resolve into this type; callers
/// inspect [`success`](ApiEnvelope::success) rather than catching errors, mirroring the
/// remote API's envelope contract.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Decoded response envelope.
	pub envelope: ApiEnvelope,
}
impl ApiResponse {
	/// Decodes `body` into a resolved response.
	///
	/// Every received response resolves: a body that is empty or does not parse as the
	/// envelope (proxies may answer resolved-class statuses with HTML) yields a derived
	/// envelope whose success flag follows the status class.
	pub fn from_body(status: u16, body: &[u8]) -> Self {
		let derived = || ApiEnvelope { success: status < 400, message: None, data: None };

		if body.is_empty() {
			return Self { status, envelope: derived() };
		}

		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let envelope =
			serde_path_to_error::deserialize(&mut deserializer).unwrap_or_else(|_| derived());

		Self { status, envelope }
	}

	/// True when the envelope reports success.
	pub fn success(&self) -> bool {
		self.envelope.success
	}

	/// Returns the envelope message, when present.
	pub fn message(&self) -> Option<&str> {
		self.envelope.message.as_deref()
	}

	/// Decodes the envelope's `data` payload into `T`.
	///
	/// Absent payloads decode from JSON null, so `Option<T>` targets resolve to `None`
	/// instead of failing.
	pub fn data_as<T>(&self) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let value = self.envelope.data.clone().unwrap_or(JsonValue::Null);

		serde_path_to_error::deserialize(value)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}

/// Extracts a best-effort failure message from a server-error body.
///
/// 5xx bodies are not guaranteed to carry the envelope (proxies may answer with HTML),
/// so parse failures degrade to a fixed message instead of masking the status.
pub(crate) fn server_error_message(body: &[u8]) -> String {
	const FALLBACK: &str = "Some Internal Server Error occurred, please try later!";

	serde_json::from_slice::<ApiEnvelope>(body)
		.ok()
		.and_then(|envelope| envelope.message)
		.unwrap_or_else(|| FALLBACK.to_owned())
}
