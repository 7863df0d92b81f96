//! Gateway-level error types shared across the transport, recovery, and endpoint layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
///
/// Client errors (4xx other than a first-time 401) are deliberately absent: the remote
/// API reports them inside its response envelope, so the gateway resolves them to the
/// caller as ordinary [`ApiResponse`](crate::api::ApiResponse) values instead of raising.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout); no response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Remote API responded with a server-side failure status (5xx).
	#[error("Remote API reported a server error ({status}): {message}.")]
	Server {
		/// HTTP status code of the failing response.
		status: u16,
		/// Best-effort message extracted from the response envelope.
		message: String,
	},
	/// Credential refresh failed; the session is no longer recoverable.
	#[error("Credential refresh failed; the client was redirected to login.")]
	AuthRecovery {
		/// HTTP status returned by the refresh endpoint, when one was received.
		status: Option<u16>,
	},
	/// Envelope payload could not be decoded into the requested type.
	#[error("Envelope payload could not be decoded.")]
	Decode {
		/// Structured parsing failure with the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response being decoded.
		status: u16,
	},
}

/// Configuration and request-construction failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// The offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
