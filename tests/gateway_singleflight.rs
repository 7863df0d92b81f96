//! Deterministic single-flight coverage against a scripted in-memory transport.

// std
use std::{
	collections::{HashMap, VecDeque},
	sync::Arc,
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
// self
use teamtact_gateway::{
	api::ApiRequest,
	error::{Error, TransportError},
	gateway::Gateway,
	http::{GatewayTransport, OutboundCall, RawResponse, TransportFuture},
	nav::{Navigator, RecordingNavigator},
	url::Url,
};

const OK_BODY: &[u8] = br#"{"success":true,"message":"ok"}"#;
const UNAUTHORIZED_BODY: &[u8] = br#"{"success":false,"message":"Invalid Credentials"}"#;

#[derive(Clone, Copy, Debug)]
enum Step {
	Respond { status: u16, body: &'static [u8], delay_ms: u64 },
	Fail,
}
impl Step {
	const fn respond(status: u16, body: &'static [u8]) -> Self {
		Step::Respond { status, body, delay_ms: 0 }
	}

	const fn respond_after(status: u16, body: &'static [u8], delay_ms: u64) -> Self {
		Step::Respond { status, body, delay_ms }
	}
}

/// Transport that replays a scripted queue of outcomes per path and logs every call.
#[derive(Default)]
struct ScriptedTransport {
	steps: Mutex<HashMap<String, VecDeque<Step>>>,
	calls: Mutex<Vec<String>>,
}
impl ScriptedTransport {
	fn script(&self, path: &str, steps: impl IntoIterator<Item = Step>) {
		self.steps.lock().insert(path.to_owned(), steps.into_iter().collect());
	}

	fn calls_to(&self, path: &str) -> usize {
		self.calls.lock().iter().filter(|recorded| recorded.as_str() == path).count()
	}
}
impl GatewayTransport for ScriptedTransport {
	fn execute(&self, call: OutboundCall) -> TransportFuture<'_> {
		let path = call.url.path().to_owned();

		Box::pin(async move {
			self.calls.lock().push(path.clone());

			let step = self.steps.lock().get_mut(&path).and_then(VecDeque::pop_front);

			match step {
				Some(Step::Respond { status, body, delay_ms }) => {
					if delay_ms > 0 {
						tokio::time::sleep(Duration::from_millis(delay_ms)).await;
					}

					Ok(RawResponse { status, body: body.to_vec() })
				},
				Some(Step::Fail) =>
					Err(TransportError::network(std::io::Error::other("connection reset"))),
				None => Ok(RawResponse { status: 200, body: OK_BODY.to_vec() }),
			}
		})
	}
}

fn build_gateway() -> (Gateway<ScriptedTransport>, Arc<ScriptedTransport>, Arc<RecordingNavigator>)
{
	let transport = Arc::new(ScriptedTransport::default());
	let navigator = Arc::new(RecordingNavigator::default());
	let nav: Arc<dyn Navigator> = navigator.clone();
	let base = Url::parse("https://api.teamtact.test/").expect("Test base URL should parse.");
	let gateway = Gateway::with_transport(base, transport.clone()).with_navigator(nav);

	(gateway, transport, navigator)
}

#[tokio::test]
async fn happy_path_refreshes_then_replays() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script(
		"/teams/",
		[Step::respond(401, UNAUTHORIZED_BODY), Step::respond(200, OK_BODY)],
	);
	transport.script("/auth/refresh", [Step::respond(200, OK_BODY)]);

	let response = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect("Recovered request should resolve.");

	assert_eq!(response.status, 200);
	assert!(response.success());
	assert_eq!(transport.calls_to("/teams/"), 2, "Original dispatch plus one replay.");
	assert_eq!(transport.calls_to("/auth/refresh"), 1);
	assert_eq!(navigator.count(), 0, "A successful refresh must not navigate.");
	assert_eq!(gateway.metrics.replays(), 1);
	assert_eq!(gateway.metrics.refresh_successes(), 1);
}

#[tokio::test]
async fn failed_refresh_redirects_once_and_surfaces_auth_recovery() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script("/teams/", [Step::respond(401, UNAUTHORIZED_BODY)]);
	transport.script("/auth/refresh", [Step::respond(401, UNAUTHORIZED_BODY)]);

	let err = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect_err("A failed refresh must surface to the caller.");

	assert!(matches!(err, Error::AuthRecovery { status: Some(401) }));
	assert_eq!(transport.calls_to("/teams/"), 1, "No replay after a failed refresh.");
	assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
	assert_eq!(gateway.metrics.refresh_failures(), 1);
}

#[tokio::test]
async fn concurrent_racers_share_one_refresh() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script(
		"/teams/",
		[Step::respond(401, UNAUTHORIZED_BODY), Step::respond(200, OK_BODY)],
	);
	transport.script(
		"/teams/t1/members",
		[Step::respond(401, UNAUTHORIZED_BODY), Step::respond(200, OK_BODY)],
	);
	// The delayed refresh keeps the shared operation active while the second racer
	// observes its 401, forcing it down the join path.
	transport.script("/auth/refresh", [Step::respond_after(200, OK_BODY, 100)]);

	let (first, second) = tokio::join!(
		gateway.send(ApiRequest::get("teams/")),
		gateway.send(ApiRequest::get("teams/t1/members")),
	);
	let first = first.expect("First racer should resolve after the shared refresh.");
	let second = second.expect("Second racer should resolve after the shared refresh.");

	assert_eq!(first.status, 200);
	assert_eq!(second.status, 200);
	assert_eq!(transport.calls_to("/auth/refresh"), 1, "Exactly one refresh on the wire.");
	assert_eq!(transport.calls_to("/teams/"), 2);
	assert_eq!(transport.calls_to("/teams/t1/members"), 2);
	assert_eq!(navigator.count(), 0);
	assert_eq!(gateway.metrics.refresh_attempts(), 1);
	assert_eq!(gateway.metrics.replays(), 2);
}

#[tokio::test]
async fn concurrent_racers_share_one_failure_and_one_redirect() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script("/teams/", [Step::respond(401, UNAUTHORIZED_BODY)]);
	transport.script("/teams/t1/members", [Step::respond(401, UNAUTHORIZED_BODY)]);
	transport.script("/auth/refresh", [Step::respond_after(401, UNAUTHORIZED_BODY, 100)]);

	let (first, second) = tokio::join!(
		gateway.send(ApiRequest::get("teams/")),
		gateway.send(ApiRequest::get("teams/t1/members")),
	);

	assert!(matches!(first, Err(Error::AuthRecovery { .. })));
	assert!(matches!(second, Err(Error::AuthRecovery { .. })));
	assert_eq!(transport.calls_to("/auth/refresh"), 1);
	assert_eq!(navigator.count(), 1, "A failed cycle must navigate exactly once.");
}

#[tokio::test]
async fn replayed_request_is_never_retried_twice() {
	let (gateway, transport, _) = build_gateway();

	transport.script(
		"/teams/",
		[Step::respond(401, UNAUTHORIZED_BODY), Step::respond(401, UNAUTHORIZED_BODY)],
	);
	transport.script("/auth/refresh", [Step::respond(200, OK_BODY)]);

	let response = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect("A 401 on the replay must resolve, not raise.");

	assert_eq!(response.status, 401);
	assert!(!response.success());
	assert_eq!(transport.calls_to("/teams/"), 2, "At most one replay per request.");
	assert_eq!(transport.calls_to("/auth/refresh"), 1, "The replay's 401 must not refresh again.");
}

#[tokio::test]
async fn forbidden_passes_through_without_refresh() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script(
		"/teams/",
		[Step::respond(403, br#"{"success":false,"message":"Email Verification is pending"}"#)],
	);

	let response = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect("4xx responses resolve to the caller.");

	assert_eq!(response.status, 403);
	assert!(!response.success());
	assert_eq!(response.message(), Some("Email Verification is pending"));
	assert_eq!(transport.calls_to("/auth/refresh"), 0);
	assert_eq!(navigator.count(), 0);
}

#[tokio::test]
async fn non_json_proxy_response_still_resolves() {
	let (gateway, transport, _) = build_gateway();

	transport.script("/teams/", [Step::respond(403, b"<html>blocked by proxy</html>")]);

	let response = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect("Every received non-5xx response resolves.");

	assert_eq!(response.status, 403);
	assert!(!response.success(), "A derived envelope follows the status class.");
}

#[tokio::test]
async fn server_errors_propagate_as_failures() {
	let (gateway, transport, _) = build_gateway();

	transport.script("/teams/", [Step::respond(503, br#"{"success":false,"message":"db down"}"#)]);

	let err = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect_err("5xx must propagate as a failure.");

	assert!(matches!(err, Error::Server { status: 503, .. }));
	assert!(err.to_string().contains("db down"));
}

#[tokio::test]
async fn transport_failures_propagate_without_retry() {
	let (gateway, transport, _) = build_gateway();

	transport.script("/teams/", [Step::Fail]);

	let err = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect_err("Transport failures must propagate.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(transport.calls_to("/teams/"), 1, "No automatic retry on transport failure.");
}

#[tokio::test]
async fn gate_is_idle_after_each_cycle_and_rearms() {
	let (gateway, transport, navigator) = build_gateway();

	transport.script(
		"/teams/",
		[
			Step::respond(401, UNAUTHORIZED_BODY),
			Step::respond(200, OK_BODY),
			Step::respond(401, UNAUTHORIZED_BODY),
		],
	);
	transport.script(
		"/auth/refresh",
		[Step::respond(200, OK_BODY), Step::respond(401, UNAUTHORIZED_BODY)],
	);

	gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect("First cycle should recover.");

	assert!(!gateway.refresh_in_flight(), "State must return to idle after settling.");

	let err = gateway
		.send(ApiRequest::get("teams/"))
		.await
		.expect_err("Second cycle should run and fail independently.");

	assert!(matches!(err, Error::AuthRecovery { .. }));
	assert!(!gateway.refresh_in_flight());
	assert_eq!(transport.calls_to("/auth/refresh"), 2, "A settled gate must rearm.");
	assert_eq!(navigator.count(), 1);
}
