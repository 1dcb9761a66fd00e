//! Transport primitives shared by the token cache and the carrier operations.
//!
//! [`HttpTransport`] is the engine's only non-deterministic boundary: it sends one
//! [`HttpRequest`] and resolves to an [`HttpResponse`] (any status) or a
//! [`TransportError`] when no response arrived. Callers convert transport errors into the
//! crate taxonomy immediately; nothing above this module sees a raw transport failure.

// std
use std::time::Duration as StdDuration;
// crates.io
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute carrier and identity-provider calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the token
/// cache and the rate operation of an adapter (typically behind `Arc<T>`). The returned
/// future must be `Send` so adapter futures can hop executors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and waits at most `request.timeout` for the response.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Minimal HTTP method set needed by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request envelope.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Headers in insertion order; names are sent as given.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<String>,
	/// Per-call timeout enforced by the transport.
	pub timeout: StdDuration,
}
impl HttpRequest {
	const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Creates a `POST` request for `url`.
	pub fn post(url: Url) -> Self {
		Self {
			method: HttpMethod::Post,
			url,
			headers: Vec::new(),
			body: None,
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets the body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Overrides the timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response envelope returned by a transport for any HTTP status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Response body decoded as text.
	pub body: String,
}
impl HttpResponse {
	/// Creates a response with the provided status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds a header; the name is lowercased.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Returns a header value by (case-insensitive) name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns the `Retry-After` hint in whole seconds, if present and well-formed.
	pub fn retry_after_secs(&self) -> Option<u64> {
		parse_retry_after(self.header("retry-after")?, OffsetDateTime::now_utc())
	}

	/// Returns `true` for 2xx statuses.
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}
}

/// Failures raised when no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The per-call timeout elapsed.
	#[error("Request timed out after {elapsed:?}.")]
	Timeout {
		/// Timeout that was in force.
		elapsed: StdDuration,
	},
	/// The connection could not be established or was reset.
	#[error("Connection failed.")]
	Connection {
		/// Transport-specific failure.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
	/// Host name resolution failed.
	#[error("DNS resolution failed.")]
	Dns {
		/// Transport-specific failure.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
	/// The call was aborted before completion.
	#[error("Request aborted: {reason}.")]
	Aborted {
		/// Why the call was aborted.
		reason: String,
	},
}
impl TransportError {
	/// Wraps a connection-level failure.
	pub fn connection(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Connection { source: Box::new(src) }
	}

	/// Wraps a resolver failure.
	pub fn dns(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Dns { source: Box::new(src) }
	}

	/// Returns `true` for [`TransportError::Timeout`].
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}

	/// Converts the failure into the crate taxonomy.
	///
	/// Timeouts become [`ErrorKind::Timeout`](crate::error::ErrorKind::Timeout); every other
	/// failure becomes a network error with this value kept as diagnostic source.
	pub fn into_error(self, target: &str) -> Error {
		if self.is_timeout() {
			Error::timeout(format!("{target} did not respond in time: {self}"))
		} else {
			Error::network(format!("{target} could not be reached: {self}"), self)
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] implementing [`HttpTransport`].
///
/// Carrier and token endpoints return results directly, so the default client never follows
/// redirects. Pass a custom client through [`ReqwestTransport::with_client`] when TLS or proxy
/// settings need to differ.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with redirects disabled.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let timeout = request.timeout;
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
			};
			let mut builder = client.request(method, request.url).timeout(timeout);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response =
				builder.send().await.map_err(|err| map_reqwest_error(err, timeout))?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|text| (name.as_str().to_owned(), text.to_owned()))
				})
				.collect();
			let body = response.text().await.map_err(|err| map_reqwest_error(err, timeout))?;

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError, timeout: StdDuration) -> TransportError {
	if err.is_timeout() {
		return TransportError::Timeout { elapsed: timeout };
	}
	if err.is_connect() && mentions_dns(&err) {
		return TransportError::dns(err);
	}

	TransportError::connection(err)
}

#[cfg(feature = "reqwest")]
fn mentions_dns(err: &ReqwestError) -> bool {
	let mut current: Option<&(dyn StdError + 'static)> = Some(err);

	while let Some(inner) = current {
		if inner.to_string().to_ascii_lowercase().contains("dns error") {
			return true;
		}

		current = inner.source();
	}

	false
}

/// Clips a response body for inclusion in error messages.
pub(crate) fn body_excerpt(body: &str) -> String {
	const BODY_EXCERPT_LIMIT: usize = 256;

	let body = body.trim();

	if body.chars().count() <= BODY_EXCERPT_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(BODY_EXCERPT_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

/// Parses a `Retry-After` value given as delta-seconds or an RFC 2822 HTTP-date.
///
/// Dates in the past yield `None`.
pub fn parse_retry_after(raw: &str, now: OffsetDateTime) -> Option<u64> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(secs);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return u64::try_from(delta.whole_seconds()).ok();
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);

		assert_eq!(parse_retry_after("30", now), Some(30));
		assert_eq!(parse_retry_after(" 7 ", now), Some(7));
		assert_eq!(parse_retry_after("Wed, 01 Jan 2025 00:02:00 +0000", now), Some(120));
		assert_eq!(parse_retry_after("Tue, 31 Dec 2024 23:00:00 +0000", now), None);
		assert_eq!(parse_retry_after("soon", now), None);
	}

	#[test]
	fn body_excerpt_truncates_long_bodies() {
		assert_eq!(body_excerpt("  short  "), "short");

		let long = "x".repeat(300);
		let excerpt = body_excerpt(&long);

		assert_eq!(excerpt.chars().count(), 257);
		assert!(excerpt.ends_with('…'));
	}

	#[test]
	fn response_headers_are_case_insensitive() {
		let response = HttpResponse::new(429, "").with_header("Retry-After", "12");

		assert_eq!(response.header("retry-after"), Some("12"));
		assert_eq!(response.retry_after_secs(), Some(12));
		assert!(!response.is_success());
	}

	#[test]
	fn transport_errors_map_into_taxonomy() {
		let timeout = TransportError::Timeout { elapsed: StdDuration::from_secs(3) };

		assert_eq!(timeout.into_error("UPS").kind, crate::error::ErrorKind::Timeout);

		let reset = TransportError::connection(std::io::Error::other("reset"));
		let err = reset.into_error("UPS");

		assert_eq!(err.kind, crate::error::ErrorKind::NetworkError);
		assert!(StdError::source(&err).is_some());
	}
}
