//! Client-credentials token cache with single-flight acquisition.
//!
//! [`TokenCache::get_valid_token`] returns the cached bearer while it is fresh (earlier than
//! `expires_at - refresh_buffer`). Otherwise callers attach to one shared in-flight
//! acquisition: the first caller drives the token request and every concurrent caller
//! observes the same token or the same failure. The in-flight marker is cleared as soon as
//! the acquisition settles, success or failure, so a failed or timed-out attempt never
//! blocks later calls. Failures are never cached.

mod metrics;

pub use self::metrics::{AcquisitionMetrics, AcquisitionStats};

// std
use std::time::Duration as StdDuration;
// crates.io
use async_lock::OnceCell;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenSecret},
	domain::CarrierId,
	http::{self, HttpRequest, HttpResponse, HttpTransport},
	obs::{self, OperationKind},
};
use self::metrics::CacheEvent;

type Acquisition = Arc<OnceCell<Result<CachedToken>>>;

/// OAuth client identity presented to the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Creates a credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}

	/// Encodes the pair as an HTTP Basic `Authorization` value.
	pub fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.client_id, self.client_secret.expose());

		format!("Basic {}", STANDARD.encode(raw))
	}
}

/// Token endpoint settings for one cache instance.
#[derive(Clone, Debug)]
pub struct TokenCacheConfig {
	/// Absolute token endpoint URL.
	pub token_url: Url,
	/// Client identity.
	pub credentials: ClientCredentials,
	/// Timeout applied to each token request.
	pub timeout: StdDuration,
	/// Lead time before expiry at which a token is treated as stale.
	pub refresh_buffer: Duration,
}
impl TokenCacheConfig {
	/// Default refresh buffer (60 seconds).
	pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::seconds(60);
	/// Default token request timeout (10 seconds).
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);
	/// Lifetime assumed when the provider omits `expires_in`.
	pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(3600);

	/// Creates a config with default timeout and refresh buffer.
	pub fn new(token_url: Url, credentials: ClientCredentials) -> Self {
		Self {
			token_url,
			credentials,
			timeout: Self::DEFAULT_TIMEOUT,
			refresh_buffer: Self::DEFAULT_REFRESH_BUFFER,
		}
	}

	/// Overrides the token request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the refresh buffer; negative values clamp to zero.
	pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}
}

#[derive(Default)]
struct Slot {
	token: Option<CachedToken>,
	in_flight: Option<Acquisition>,
}

enum Lookup {
	Fresh(TokenSecret),
	Pending(Acquisition),
}

/// Bearer token cache owned by exactly one carrier adapter.
pub struct TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	carrier: CarrierId,
	transport: Arc<T>,
	config: TokenCacheConfig,
	slot: Mutex<Slot>,
	metrics: AcquisitionMetrics,
}
impl<T> TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an empty cache for `carrier`.
	pub fn new(carrier: CarrierId, transport: impl Into<Arc<T>>, config: TokenCacheConfig) -> Self {
		Self {
			carrier,
			transport: transport.into(),
			config,
			slot: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Returns a bearer token that stays valid for at least the refresh buffer.
	///
	/// Suspends on the token endpoint when the cache is empty or stale. Concurrent callers share
	/// one acquisition.
	pub async fn get_valid_token(&self) -> Result<TokenSecret> {
		let acquisition = match self.lookup(OffsetDateTime::now_utc()) {
			Lookup::Fresh(secret) => {
				self.metrics.record(CacheEvent::Hit);

				return Ok(secret);
			},
			Lookup::Pending(acquisition) => {
				self.metrics.record(CacheEvent::Miss);

				acquisition
			},
		};
		let outcome = acquisition
			.get_or_init(|| async {
				let outcome = self.acquire().await;

				self.settle(&acquisition, &outcome);

				outcome
			})
			.await;

		outcome.clone().map(|token| token.access_token)
	}

	/// Drops the cached token so the next call re-acquires.
	///
	/// An acquisition already in flight is left to finish and will repopulate the cache.
	pub fn invalidate_token(&self) {
		self.slot.lock().token = None;
	}

	/// Returns a copy of the cached token, fresh or not.
	pub fn cached(&self) -> Option<CachedToken> {
		self.slot.lock().token.clone()
	}

	/// Returns the hit/miss and acquisition counters for this cache.
	pub fn metrics(&self) -> &AcquisitionMetrics {
		&self.metrics
	}

	fn lookup(&self, now: OffsetDateTime) -> Lookup {
		let mut slot = self.slot.lock();

		if let Some(token) =
			slot.token.as_ref().filter(|token| token.is_fresh_at(now, self.config.refresh_buffer))
		{
			return Lookup::Fresh(token.access_token.clone());
		}

		Lookup::Pending(slot.in_flight.get_or_insert_with(|| Arc::new(OnceCell::new())).clone())
	}

	fn settle(&self, acquisition: &Acquisition, outcome: &Result<CachedToken>) {
		let mut slot = self.slot.lock();

		if slot.in_flight.as_ref().is_some_and(|current| Arc::ptr_eq(current, acquisition)) {
			slot.in_flight = None;
		}

		slot.token = outcome.as_ref().ok().cloned();
	}

	async fn acquire(&self) -> Result<CachedToken> {
		obs::observe(OperationKind::TokenAcquisition, &self.carrier, async {
			let body = url::form_urlencoded::Serializer::new(String::new())
				.append_pair("grant_type", "client_credentials")
				.finish();
			let request = HttpRequest::post(self.config.token_url.clone())
				.with_header("Authorization", self.config.credentials.basic_authorization())
				.with_header("Content-Type", "application/x-www-form-urlencoded")
				.with_header("Accept", "application/json")
				.with_body(body)
				.with_timeout(self.config.timeout);
			let result = match self.transport.send(request).await {
				Ok(response) => parse_token_response(&response, OffsetDateTime::now_utc()),
				Err(err) => Err(err.into_error("Token endpoint")),
			};

			self.metrics.record(if result.is_ok() {
				CacheEvent::Acquired
			} else {
				CacheEvent::Failed
			});

			result
		})
		.await
	}
}
impl<T> Debug for TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let slot = self.slot.lock();

		f.debug_struct("TokenCache")
			.field("carrier", &self.carrier)
			.field("token_url", &self.config.token_url.as_str())
			.field("cached", &slot.token.is_some())
			.field("in_flight", &slot.in_flight.is_some())
			.finish()
	}
}

/// Classifies a token endpoint response observed at `now`.
pub fn parse_token_response(response: &HttpResponse, now: OffsetDateTime) -> Result<CachedToken> {
	match response.status {
		200 => {},
		429 => return Err(Error::rate_limited("Token endpoint", response.retry_after_secs())),
		401 | 403 =>
			return Err(Error::auth_failed(
				format!(
					"Token endpoint rejected the client credentials (HTTP {}).",
					response.status
				),
				Some(response.status),
			)),
		status =>
			return Err(Error::auth_failed(
				format!(
					"Token endpoint returned HTTP {status}: {}",
					http::body_excerpt(&response.body)
				),
				Some(status),
			)),
	}

	let malformed = || {
		Error::auth_failed("Token endpoint response is missing a string access_token.", Some(200))
	};
	let payload = serde_json::from_str::<Value>(&response.body).map_err(|_| malformed())?;
	let access_token = payload
		.get("access_token")
		.and_then(Value::as_str)
		.filter(|token| !token.is_empty())
		.ok_or_else(malformed)?;
	let expires_in = payload
		.get("expires_in")
		.and_then(parse_expires_in)
		.filter(|lifetime| now.checked_add(*lifetime).is_some())
		.unwrap_or(TokenCacheConfig::DEFAULT_EXPIRES_IN);

	Ok(CachedToken::issued(access_token, now, expires_in))
}

fn parse_expires_in(value: &Value) -> Option<Duration> {
	let secs = match value {
		Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|v| v as i64)),
		Value::String(text) => text.trim().parse::<i64>().ok(),
		_ => None,
	}?;

	(secs > 0).then(|| Duration::seconds(secs))
}
