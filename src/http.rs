//! Transport primitives for outbound TeamTact API calls.
//!
//! The module exposes [`GatewayTransport`] alongside [`OutboundCall`] and [`RawResponse`]
//! so downstream crates can integrate custom HTTP clients. The trait is the gateway's
//! only dependency on an HTTP stack: the gateway hands a fully-resolved call descriptor
//! to the transport and expects either a status + body pair or a [`TransportError`],
//! never a panic. Credentials travel as ambient cookies held by the transport itself,
//! so implementations against cookie-less stacks must provide their own jar.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`GatewayTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// HTTP method subset used by the TeamTact API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully-resolved outbound call handed to a transport.
///
/// The gateway has already joined the request path onto its base URL and serialized the
/// body; transports only add protocol-level concerns (JSON content type, cookie jar).
#[derive(Clone, Debug)]
pub struct OutboundCall {
	/// HTTP method for the call.
	pub method: Method,
	/// Absolute URL to dispatch to.
	pub url: Url,
	/// Serialized JSON body, when the call carries one.
	pub body: Option<JsonValue>,
}

/// Status + body pair produced by a transport.
///
/// A value of this type means the remote API answered; transport failures (DNS, TCP,
/// TLS, timeout) never produce a [`RawResponse`] and surface as [`TransportError`]
/// instead. That distinction drives the gateway's recovery policy.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// True when the status signals an authorization failure (HTTP 401).
	pub const fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// True when the status falls in the server-error range (>= 500).
	pub const fn is_server_error(&self) -> bool {
		self.status >= 500
	}

	/// True when the status falls in the success range (2xx).
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}
}

/// Abstraction over HTTP transports capable of executing TeamTact API calls.
///
/// Implementations must be `Send + Sync` so a single transport instance can serve every
/// concurrently in-flight gateway request. The returned future owns whatever state it
/// needs, letting the gateway box and race calls freely.
pub trait GatewayTransport
where
	Self: Send + Sync,
{
	/// Executes the call, resolving to the remote response or a transport failure.
	fn execute(&self, call: OutboundCall) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default constructor enables reqwest's cookie store, because the TeamTact API
/// authenticates via httponly session cookies rather than explicit headers. Callers
/// supplying their own [`ReqwestClient`] must keep a cookie provider attached or the
/// refresh flow will never observe rotated credentials.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a fresh cookie-enabled reqwest client.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().cookie_store(true).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayTransport for ReqwestTransport {
	fn execute(&self, call: OutboundCall) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match call.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, call.url);

			if let Some(body) = &call.body {
				builder = builder
					.header(reqwest::header::CONTENT_TYPE, "application/json")
					.body(serde_json::to_vec(body).map_err(TransportError::network)?);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}
