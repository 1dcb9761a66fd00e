//! Closed failure taxonomy shared by every component of the integration engine.
//!
//! Runtime failures surface as one [`Error`] value tagged with an [`ErrorKind`]. The kind set
//! is exhaustive: a new upstream failure mode needs a new kind here rather than an ad-hoc
//! message. Construction-time problems (bad URLs, empty credentials) use [`ConfigError`]
//! and never reach a runtime operation.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type SharedSource = Arc<dyn StdError + Send + Sync>;

/// Failure kinds recognized by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Credentials were rejected or the identity provider returned no usable token.
	AuthFailed,
	/// Upstream throttled the caller (HTTP 429).
	RateLimited,
	/// Carrier rejected the request as malformed (HTTP 400).
	InvalidRequest,
	/// Transport failed before an HTTP response arrived.
	NetworkError,
	/// Transport gave up waiting for a response.
	Timeout,
	/// Carrier answered successfully but the body could not be decoded.
	MalformedResponse,
	/// Carrier answered with any other error status.
	CarrierError,
	/// Caller input failed structural validation; nothing was sent.
	ValidationError,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::AuthFailed => "AUTH_FAILED",
			ErrorKind::RateLimited => "RATE_LIMITED",
			ErrorKind::InvalidRequest => "INVALID_REQUEST",
			ErrorKind::NetworkError => "NETWORK_ERROR",
			ErrorKind::Timeout => "TIMEOUT",
			ErrorKind::MalformedResponse => "MALFORMED_RESPONSE",
			ErrorKind::CarrierError => "CARRIER_ERROR",
			ErrorKind::ValidationError => "VALIDATION_ERROR",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Carrier-native error code/message pair parsed from an error body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarrierDetail {
	/// Carrier-specific error code.
	pub code: Option<String>,
	/// Carrier-specific error message.
	pub message: Option<String>,
}

/// Canonical runtime error returned by every public operation.
///
/// Values are only produced through the per-kind constructors below. The diagnostic source
/// is kept for `std::error::Error::source` chains and is never serialized.
#[derive(Clone, Debug, Serialize, ThisError)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
#[error("{message}")]
pub struct Error {
	/// Failure kind.
	pub kind: ErrorKind,
	/// Human-readable summary.
	pub message: String,
	/// HTTP status observed upstream, when one was received.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub http_status: Option<u16>,
	/// Carrier-native error code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub carrier_code: Option<String>,
	/// Carrier-native error message.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub carrier_message: Option<String>,
	/// Correlation id of the failing call.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_id: Option<String>,
	/// Retry-After hint in seconds (rate limiting only).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub retry_after_secs: Option<u64>,
	#[serde(skip)]
	#[source]
	source: Option<SharedSource>,
}
impl Error {
	fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			http_status: None,
			carrier_code: None,
			carrier_message: None,
			request_id: None,
			retry_after_secs: None,
			source: None,
		}
	}

	/// Authentication failure, optionally tied to the HTTP status that caused it.
	pub fn auth_failed(message: impl Into<String>, http_status: Option<u16>) -> Self {
		Self { http_status, ..Self::new(ErrorKind::AuthFailed, message) }
	}

	/// Throttling failure. Always carries HTTP 429; the hint is embedded in the message.
	pub fn rate_limited(origin: &str, retry_after_secs: Option<u64>) -> Self {
		let message = match retry_after_secs {
			Some(secs) => format!("{origin} rate limit exceeded; retry after {secs} seconds."),
			None => format!("{origin} rate limit exceeded."),
		};

		Self {
			http_status: Some(429),
			retry_after_secs,
			..Self::new(ErrorKind::RateLimited, message)
		}
	}

	/// Carrier rejected the request body. Always carries HTTP 400.
	pub fn invalid_request(message: impl Into<String>, detail: CarrierDetail) -> Self {
		Self {
			http_status: Some(400),
			carrier_code: detail.code,
			carrier_message: detail.message,
			..Self::new(ErrorKind::InvalidRequest, message)
		}
	}

	/// Transport failed before any response arrived.
	pub fn network(
		message: impl Into<String>,
		source: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self { source: Some(Arc::new(source)), ..Self::new(ErrorKind::NetworkError, message) }
	}

	/// Transport timed out.
	pub fn timeout(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Timeout, message)
	}

	/// Success response whose body could not be decoded.
	pub fn malformed_response(
		message: impl Into<String>,
		source: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self { source: Some(Arc::new(source)), ..Self::new(ErrorKind::MalformedResponse, message) }
	}

	/// Any other carrier error status.
	pub fn carrier(message: impl Into<String>, http_status: u16, detail: CarrierDetail) -> Self {
		Self {
			http_status: Some(http_status),
			carrier_code: detail.code,
			carrier_message: detail.message,
			..Self::new(ErrorKind::CarrierError, message)
		}
	}

	/// Caller input failed validation or could not be routed to a carrier.
	pub fn validation(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::ValidationError, message)
	}

	/// Attaches the correlation id of the failing call.
	pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
		self.request_id = Some(request_id.into());

		self
	}

	/// Returns `true` when the error matches `kind`.
	pub fn is(&self, kind: ErrorKind) -> bool {
		self.kind == kind
	}
}

/// Construction-time configuration failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required credential was empty.
	#[error("The {field} credential must not be empty.")]
	EmptyCredential {
		/// Name of the empty field.
		field: &'static str,
	},
	/// A URL could not be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Name of the offending field.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A URL used a scheme other than http or https.
	#[error("The {field} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Name of the offending field.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// A timeout was configured as zero.
	#[error("The {field} timeout must be positive.")]
	NonPositiveTimeout {
		/// Name of the offending field.
		field: &'static str,
	},
	/// A numeric setting could not be parsed.
	#[error("The {field} value `{value}` is not a valid number.")]
	InvalidNumber {
		/// Name of the offending field.
		field: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// A required setting was absent from the lookup source.
	#[error("The {key} setting is missing.")]
	MissingSetting {
		/// Setting key.
		key: &'static str,
	},
	/// A carrier identifier failed validation.
	#[error(transparent)]
	InvalidCarrierId(#[from] crate::domain::CarrierIdError),
	/// The service was asked to default to a carrier it does not have.
	#[error("Default carrier `{carrier}` is not registered.")]
	UnknownDefaultCarrier {
		/// Carrier identifier.
		carrier: String,
	},
	/// Two adapters were registered under the same identifier.
	#[error("Carrier `{carrier}` is registered more than once.")]
	DuplicateCarrier {
		/// Carrier identifier.
		carrier: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
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
