//! UPS adapter configuration.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, TokenCacheConfig, TokenSecret},
	error::ConfigError,
};

/// Validated settings for one UPS adapter, built once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpsConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Base URL of the UPS API (the rating paths are resolved against it).
	pub base_url: Url,
	/// Token endpoint, either explicit or derived from `base_url`.
	pub token_url: Url,
	/// Rating API version segment (e.g. `v2403`).
	pub api_version: String,
	/// Value of the `transactionSrc` header.
	pub transaction_source: String,
	/// Shipper account number; enables negotiated rates when present.
	pub shipper_number: Option<String>,
	/// Timeout for rating calls.
	pub request_timeout: StdDuration,
	/// Timeout for token calls.
	pub token_timeout: StdDuration,
	/// Lead time before token expiry at which the cache refreshes.
	pub refresh_buffer: Duration,
}
impl UpsConfig {
	/// UPS customer-integration environment.
	pub const DEFAULT_BASE_URL: &'static str = "https://wwwcie.ups.com";
	/// Path of the client-credentials endpoint relative to the base URL.
	pub const TOKEN_PATH: &'static str = "security/v1/oauth/token";
	/// Default rating API version.
	pub const DEFAULT_API_VERSION: &'static str = "v2403";
	/// Default `transactionSrc` header value.
	pub const DEFAULT_TRANSACTION_SOURCE: &'static str = "carrier-integration";
	/// Default per-call timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Starts a builder seeded with the mandatory credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> UpsConfigBuilder {
		UpsConfigBuilder::new(client_id, client_secret)
	}

	/// Builds a config from `UPS_*` settings provided by `lookup`.
	///
	/// `UPS_CLIENT_ID` and `UPS_CLIENT_SECRET` are required; `UPS_BASE_URL`, `UPS_TOKEN_URL`,
	/// `UPS_API_VERSION`, `UPS_TRANSACTION_SOURCE`, `UPS_SHIPPER_NUMBER` and `UPS_TIMEOUT_MS`
	/// are optional. Blank values count as absent.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
		let client_id =
			get("UPS_CLIENT_ID").ok_or(ConfigError::MissingSetting { key: "UPS_CLIENT_ID" })?;
		let client_secret = get("UPS_CLIENT_SECRET")
			.ok_or(ConfigError::MissingSetting { key: "UPS_CLIENT_SECRET" })?;
		let mut builder = Self::builder(client_id, client_secret);

		if let Some(raw) = get("UPS_BASE_URL") {
			builder = builder.base_url(parse_url("base", &raw)?);
		}
		if let Some(raw) = get("UPS_TOKEN_URL") {
			builder = builder.token_url(parse_url("token", &raw)?);
		}
		if let Some(version) = get("UPS_API_VERSION") {
			builder = builder.api_version(version);
		}
		if let Some(source) = get("UPS_TRANSACTION_SOURCE") {
			builder = builder.transaction_source(source);
		}
		if let Some(number) = get("UPS_SHIPPER_NUMBER") {
			builder = builder.shipper_number(number);
		}
		if let Some(raw) = get("UPS_TIMEOUT_MS") {
			let millis = raw
				.trim()
				.parse::<u64>()
				.map_err(|_| ConfigError::InvalidNumber { field: "UPS_TIMEOUT_MS", value: raw })?;
			let timeout = StdDuration::from_millis(millis);

			builder = builder.request_timeout(timeout).token_timeout(timeout);
		}

		builder.build()
	}

	/// Builds a config from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Resolves a relative resource `path` under `base_url`, keeping any path prefix.
	pub fn endpoint(&self, path: &str) -> Url {
		resolve(&self.base_url, path)
	}

	/// Derives the token cache settings.
	pub fn token_cache_config(&self) -> TokenCacheConfig {
		TokenCacheConfig::new(
			self.token_url.clone(),
			ClientCredentials {
				client_id: self.client_id.clone(),
				client_secret: self.client_secret.clone(),
			},
		)
		.with_timeout(self.token_timeout)
		.with_refresh_buffer(self.refresh_buffer)
	}
}

/// Builder for [`UpsConfig`].
#[derive(Clone, Debug)]
pub struct UpsConfigBuilder {
	client_id: String,
	client_secret: TokenSecret,
	base_url: Option<Url>,
	token_url: Option<Url>,
	api_version: String,
	transaction_source: String,
	shipper_number: Option<String>,
	request_timeout: StdDuration,
	token_timeout: StdDuration,
	refresh_buffer: Duration,
}
impl UpsConfigBuilder {
	fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			base_url: None,
			token_url: None,
			api_version: UpsConfig::DEFAULT_API_VERSION.into(),
			transaction_source: UpsConfig::DEFAULT_TRANSACTION_SOURCE.into(),
			shipper_number: None,
			request_timeout: UpsConfig::DEFAULT_TIMEOUT,
			token_timeout: UpsConfig::DEFAULT_TIMEOUT,
			refresh_buffer: TokenCacheConfig::DEFAULT_REFRESH_BUFFER,
		}
	}

	/// Overrides the API base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets an explicit token endpoint, bypassing the base URL.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Overrides the rating API version.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Overrides the `transactionSrc` header value.
	pub fn transaction_source(mut self, source: impl Into<String>) -> Self {
		self.transaction_source = source.into();

		self
	}

	/// Sets the shipper account number.
	pub fn shipper_number(mut self, number: impl Into<String>) -> Self {
		self.shipper_number = Some(number.into());

		self
	}

	/// Overrides the rating call timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the token call timeout.
	pub fn token_timeout(mut self, timeout: StdDuration) -> Self {
		self.token_timeout = timeout;

		self
	}

	/// Overrides the token refresh buffer.
	pub fn refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = buffer;

		self
	}

	/// Validates and produces the config.
	pub fn build(self) -> Result<UpsConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "client_id" });
		}
		if self.client_secret.expose().trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "client_secret" });
		}
		if self.request_timeout.is_zero() {
			return Err(ConfigError::NonPositiveTimeout { field: "request" });
		}
		if self.token_timeout.is_zero() {
			return Err(ConfigError::NonPositiveTimeout { field: "token" });
		}

		let base_url = match self.base_url {
			Some(url) => url,
			None => parse_url("base", UpsConfig::DEFAULT_BASE_URL)?,
		};

		validate_scheme("base", &base_url)?;

		let token_url = match self.token_url {
			Some(url) => url,
			None => resolve(&base_url, UpsConfig::TOKEN_PATH),
		};

		validate_scheme("token", &token_url)?;

		Ok(UpsConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			base_url,
			token_url,
			api_version: self.api_version,
			transaction_source: self.transaction_source,
			shipper_number: self.shipper_number.filter(|number| !number.trim().is_empty()),
			request_timeout: self.request_timeout,
			token_timeout: self.token_timeout,
			refresh_buffer: if self.refresh_buffer.is_negative() {
				Duration::ZERO
			} else {
				self.refresh_buffer
			},
		})
	}
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn resolve(base: &Url, path: &str) -> Url {
	let mut url = base.clone();

	// Base URLs are http(s) after validation, so they always accept path segments.
	if let Ok(mut segments) = url.path_segments_mut() {
		segments.pop_if_empty().extend(path.split('/').filter(|segment| !segment.is_empty()));
	}

	url
}

fn validate_scheme(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { field, url: url.to_string() }),
	}
}
