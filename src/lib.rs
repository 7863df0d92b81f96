//! TeamTact's client-side API gateway—single-flight credential refresh, typed auth/team
//! endpoint bindings, and in-process session state in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod error;
pub mod gateway;
pub mod http;
pub mod nav;
pub mod obs;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		gateway::Gateway,
		http::ReqwestTransport,
		nav::{Navigator, RecordingNavigator},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestTransport>;

	/// Builds a reqwest transport whose cookie jar is enabled, matching the ambient-credential
	/// model the gateway relies on in production.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.build()
			.expect("Failed to build cookie-enabled Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`Gateway`] against `base_url` with a [`RecordingNavigator`] so tests can
	/// assert on login redirects.
	pub fn build_reqwest_test_gateway(
		base_url: &str,
	) -> (ReqwestTestGateway, Arc<RecordingNavigator>) {
		let base = Url::parse(base_url).expect("Test base URL should parse successfully.");
		let navigator = Arc::new(RecordingNavigator::default());
		let nav: Arc<dyn Navigator> = navigator.clone();
		let gateway = Gateway::with_transport(base, test_reqwest_transport()).with_navigator(nav);

		(gateway, navigator)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::OnceCell as AsyncOnceCell;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {httpmock as _, tokio as _};
