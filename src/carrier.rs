//! Carrier adapters and the capabilities they expose.
//!
//! A carrier is modeled as a set of capabilities rather than a class hierarchy. Today every
//! adapter exposes [`RateCapability`]; tracking or label capabilities would be added as sibling
//! traits without touching existing adapters. The integration service depends only on
//! [`CarrierAdapter`].

pub mod ups;

// self
use crate::{
	_prelude::*,
	domain::{CarrierId, RateRequest, RateResponse},
};

/// Boxed future returned by [`RateCapability::get_rates`].
pub type RateFuture<'a> = Pin<Box<dyn Future<Output = Result<RateResponse>> + 'a + Send>>;

/// Quotes shipping rates for a validated request.
///
/// Implementations must never panic on carrier input: every exit is a [`Result`] whose error
/// carries one of the crate's error kinds.
pub trait RateCapability: Send + Sync {
	/// Requests quotes for `request` from the carrier.
	fn get_rates<'a>(&'a self, request: &'a RateRequest) -> RateFuture<'a>;
}

/// Carrier-specific bundle registered with the integration service.
///
/// Each adapter owns its own token cache and transport handle; adapters never reference each
/// other.
pub trait CarrierAdapter: Send + Sync {
	/// Identifier the adapter is registered under.
	fn carrier_id(&self) -> &CarrierId;

	/// Rate-quoting capability.
	fn rate(&self) -> &dyn RateCapability;

	/// Drops any cached credentials so the next call re-authenticates.
	fn invalidate_token(&self);
}
