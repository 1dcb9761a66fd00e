// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
// self
use carrier_integration::{
	_preludet::*,
	auth::{AcquisitionStats, ClientCredentials, TokenCache, TokenCacheConfig},
	domain::CarrierId,
	error::ErrorKind,
	http::{HttpMethod, HttpResponse, ReqwestTransport, TransportError},
};

const TOKEN_PATH: &str = "/security/v1/oauth/token";

fn ups() -> CarrierId {
	CarrierId::new("ups").expect("Carrier identifier fixture should be valid.")
}

fn cache_config(token_url: &str) -> TokenCacheConfig {
	TokenCacheConfig::new(
		Url::parse(token_url).expect("Token URL fixture should parse."),
		ClientCredentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET),
	)
}

fn reqwest_cache(server: &MockServer) -> TokenCache<ReqwestTransport> {
	let transport = ReqwestTransport::new().expect("Reqwest transport should build.");

	TokenCache::new(ups(), transport, cache_config(&server.url(TOKEN_PATH)))
}

fn scripted_cache(transport: &Arc<ScriptedTransport>) -> TokenCache<ScriptedTransport> {
	let config = cache_config("https://ups.test/security/v1/oauth/token");

	TokenCache::new(ups(), transport.clone(), config)
}

#[tokio::test]
async fn concurrent_callers_share_one_acquisition() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(token_body("shared-token", 14399));
		})
		.await;
	let cache = reqwest_cache(&server);
	let (a, b, c, d) = tokio::join!(
		cache.get_valid_token(),
		cache.get_valid_token(),
		cache.get_valid_token(),
		cache.get_valid_token(),
	);

	for token in [a, b, c, d] {
		let token = token.expect("Concurrent caller should receive the token.");

		assert_eq!(token.expose(), "shared-token");
	}

	mock.assert_calls_async(1).await;

	assert_eq!(
		cache.metrics().snapshot(),
		AcquisitionStats { cache_hits: 0, cache_misses: 4, acquisitions: 1, failures: 0 }
	);
}

#[tokio::test]
async fn concurrent_callers_share_one_failure() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(401, serde_json::json!({ "response": { "errors": [] } }));

	let cache = scripted_cache(&transport);
	let guard = transport.hold().await;
	let release = async move {
		tokio::time::sleep(StdDuration::from_millis(20)).await;

		drop(guard);
	};
	let (a, b, c, ()) = tokio::join!(
		cache.get_valid_token(),
		cache.get_valid_token(),
		cache.get_valid_token(),
		release,
	);

	for outcome in [a, b, c] {
		let err = outcome.expect_err("Every waiter should observe the shared failure.");

		assert_eq!(err.kind, ErrorKind::AuthFailed);
		assert_eq!(err.http_status, Some(401));
	}

	assert_eq!(transport.request_count(), 1);
	assert!(cache.cached().is_none(), "Failures must never populate the cache.");
}

#[tokio::test]
async fn token_request_uses_basic_auth_and_form_body() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(200, token_body("form-token", 3600));

	let cache = scripted_cache(&transport);

	cache.get_valid_token().await.expect("Token acquisition should succeed.");

	let requests = transport.requests();
	let request = &requests[0];

	assert_eq!(request.method, HttpMethod::Post);
	assert_eq!(request.url.path(), TOKEN_PATH);
	assert_eq!(
		request.header("authorization"),
		Some("Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ="),
		"Credentials must be sent as HTTP Basic."
	);
	assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
	assert_eq!(request.body.as_deref(), Some("grant_type=client_credentials"));
	assert_eq!(request.timeout, TokenCacheConfig::DEFAULT_TIMEOUT);
}

#[tokio::test]
async fn cached_token_is_reused_until_invalidated() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(200, token_body("first", 3600)).push_json(200, token_body("second", 3600));

	let cache = scripted_cache(&transport);
	let first = cache.get_valid_token().await.expect("First acquisition should succeed.");
	let reused = cache.get_valid_token().await.expect("Cached token should be returned.");

	assert_eq!(first.expose(), "first");
	assert_eq!(reused.expose(), "first");
	assert_eq!(transport.request_count(), 1);
	assert_eq!(cache.metrics().snapshot().cache_hits, 1);

	cache.invalidate_token();

	assert!(cache.cached().is_none());

	let refreshed = cache.get_valid_token().await.expect("Re-acquisition should succeed.");

	assert_eq!(refreshed.expose(), "second");
	assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn token_inside_refresh_buffer_is_reacquired() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(200, token_body("short-a", 30)).push_json(200, token_body("short-b", 30));

	let cache = scripted_cache(&transport);
	let first = cache.get_valid_token().await.expect("First call should succeed.");
	let second = cache.get_valid_token().await.expect("Second call should succeed.");

	assert_eq!(first.expose(), "short-a");
	assert_eq!(second.expose(), "short-b", "Tokens inside the refresh buffer must not be reused.");
	assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn rate_limited_token_endpoint_reports_retry_after() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(429).header("retry-after", "30").body("Too Many Requests");
		})
		.await;
	let cache = reqwest_cache(&server);
	let err = cache.get_valid_token().await.expect_err("Throttled token calls must fail.");

	assert_eq!(err.kind, ErrorKind::RateLimited);
	assert_eq!(err.http_status, Some(429));
	assert_eq!(err.retry_after_secs, Some(30));
	assert!(err.message.contains("30"), "Message should embed the retry hint: {}", err.message);

	mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_auth_failure_and_not_cached() {
	let transport = Arc::new(ScriptedTransport::new());

	transport
		.push_response(HttpResponse::new(500, "identity provider unavailable"))
		.push_json(200, token_body("recovered", 3600));

	let cache = scripted_cache(&transport);
	let err = cache.get_valid_token().await.expect_err("HTTP 500 must fail the acquisition.");

	assert_eq!(err.kind, ErrorKind::AuthFailed);
	assert_eq!(err.http_status, Some(500));
	assert!(err.message.contains("identity provider unavailable"));

	let token = cache.get_valid_token().await.expect("Next call should retry and succeed.");

	assert_eq!(token.expose(), "recovered");
	let stats = cache.metrics().snapshot();

	assert_eq!(stats.acquisitions, 2);
	assert_eq!(stats.failures, 1);
}

#[tokio::test]
async fn missing_access_token_is_auth_failure() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(200, serde_json::json!({ "token_type": "Bearer", "expires_in": "3600" }));

	let err = scripted_cache(&transport)
		.get_valid_token()
		.await
		.expect_err("A body without access_token must fail.");

	assert_eq!(err.kind, ErrorKind::AuthFailed);
}

#[tokio::test]
async fn transport_timeout_is_reported_and_does_not_block_later_calls() {
	let transport = Arc::new(ScriptedTransport::new());

	transport
		.push_error(TransportError::Timeout { elapsed: StdDuration::from_secs(10) })
		.push_json(200, token_body("after-timeout", 3600));

	let cache = scripted_cache(&transport);
	let err = cache.get_valid_token().await.expect_err("Timeouts must fail the acquisition.");

	assert_eq!(err.kind, ErrorKind::Timeout);

	let token = cache.get_valid_token().await.expect("Later calls must not stay blocked.");

	assert_eq!(token.expose(), "after-timeout");
}

#[tokio::test]
async fn reqwest_timeout_maps_to_timeout_kind() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.delay(StdDuration::from_millis(750))
				.json_body(token_body("too-late", 3600));
		})
		.await;

	let transport = ReqwestTransport::new().expect("Reqwest transport should build.");
	let cache = <TokenCache<ReqwestTransport>>::new(
		ups(),
		transport,
		cache_config(&server.url(TOKEN_PATH)).with_timeout(StdDuration::from_millis(100)),
	);
	let err = cache.get_valid_token().await.expect_err("Slow token endpoints must time out.");

	assert_eq!(err.kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn invalidation_during_acquisition_keeps_the_fresh_token() {
	let transport = Arc::new(ScriptedTransport::new());

	transport.push_json(200, token_body("in-flight", 3600));

	let cache = scripted_cache(&transport);
	let guard = transport.hold().await;
	let racer = &cache;
	let invalidate_then_release = async move {
		tokio::time::sleep(StdDuration::from_millis(20)).await;

		racer.invalidate_token();

		drop(guard);
	};
	let (token, ()) = tokio::join!(cache.get_valid_token(), invalidate_then_release);

	assert_eq!(token.expect("In-flight acquisition should complete.").expose(), "in-flight");
	assert!(cache.cached().is_some(), "The completed acquisition repopulates the cache.");
}
