//! UPS carrier adapter.
//!
//! [`UpsAdapter`] owns one [`TokenCache`] and one [`UpsRateOperation`] that share a transport
//! and the client credentials from [`UpsConfig`].

pub mod config;
pub mod mapper;
pub mod rate;
pub mod wire;

pub use config::*;
pub use rate::*;

// self
use crate::{
	_prelude::*,
	auth::TokenCache,
	carrier::{CarrierAdapter, RateCapability},
	domain::CarrierId,
	error::ConfigError,
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// UPS implementation of [`CarrierAdapter`].
pub struct UpsAdapter<T>
where
	T: ?Sized + HttpTransport,
{
	id: CarrierId,
	tokens: Arc<TokenCache<T>>,
	rates: UpsRateOperation<T>,
}
impl<T> UpsAdapter<T>
where
	T: ?Sized + HttpTransport,
{
	/// Identifier used when none is given.
	pub const DEFAULT_ID: &'static str = "ups";

	/// Builds an adapter registered as `ups`.
	pub fn new(config: UpsConfig, transport: impl Into<Arc<T>>) -> Result<Self, ConfigError> {
		Ok(Self::with_id(CarrierId::new(Self::DEFAULT_ID)?, config, transport))
	}

	/// Builds an adapter registered under `id`.
	pub fn with_id(id: CarrierId, config: UpsConfig, transport: impl Into<Arc<T>>) -> Self {
		let transport = transport.into();
		let tokens = Arc::new(TokenCache::new(
			id.clone(),
			transport.clone(),
			config.token_cache_config(),
		));
		let rates = UpsRateOperation::new(id.clone(), Arc::new(config), transport, tokens.clone());

		Self { id, tokens, rates }
	}

	/// Returns the adapter's token cache.
	pub fn token_cache(&self) -> &TokenCache<T> {
		&self.tokens
	}

	/// Returns the rating operation.
	pub fn rate_operation(&self) -> &UpsRateOperation<T> {
		&self.rates
	}
}
#[cfg(feature = "reqwest")]
impl UpsAdapter<ReqwestTransport> {
	/// Builds an adapter over a fresh reqwest client.
	pub fn from_config(config: UpsConfig) -> Result<Self, ConfigError> {
		Self::new(config, ReqwestTransport::new()?)
	}
}
impl<T> CarrierAdapter for UpsAdapter<T>
where
	T: ?Sized + HttpTransport,
{
	fn carrier_id(&self) -> &CarrierId {
		&self.id
	}

	fn rate(&self) -> &dyn RateCapability {
		&self.rates
	}

	fn invalidate_token(&self) {
		self.tokens.invalidate_token();
	}
}
impl<T> Debug for UpsAdapter<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UpsAdapter").field("id", &self.id).field("rates", &self.rates).finish()
	}
}
