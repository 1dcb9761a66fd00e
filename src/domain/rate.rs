//! Rate requests, service-level filters and the quotes carriers return.

// self
use crate::{
	_prelude::*,
	domain::{Address, CarrierId, Package},
};

/// Narrows a rate request to one carrier service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLevelFilter {
	/// Carrier-specific service code (e.g. UPS `03`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Human-readable description forwarded alongside the code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl ServiceLevelFilter {
	/// Maximum characters in a service code.
	pub const CODE_MAX_LEN: usize = 10;
	/// Maximum characters in a description.
	pub const DESCRIPTION_MAX_LEN: usize = 35;

	/// Creates a filter for `code`.
	pub fn code(code: impl Into<String>) -> Self {
		Self { code: Some(code.into()), description: None }
	}
}

/// Carrier-agnostic rate request.
///
/// Values that did not come out of [`validate()`](crate::domain::validate()) must not reach a
/// carrier; the integration service always validates before dispatching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
	/// Ship-from address.
	pub origin: Address,
	/// Ship-to address.
	pub destination: Address,
	/// Parcel being rated.
	pub package: Package,
	/// Optional single-service filter; absent means "shop all services".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_level: Option<ServiceLevelFilter>,
}
impl RateRequest {
	/// Returns the service code to rate, when the request targets one service.
	pub fn requested_service(&self) -> Option<&str> {
		self.service_level.as_ref().and_then(|filter| filter.code.as_deref()).map(str::trim)
	}
}

/// One priced service option returned by a carrier.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RateQuote {
	/// Display name of the service.
	pub service_name: String,
	/// Carrier-specific service code.
	pub service_code: String,
	/// Non-negative total charge; `0` when the carrier supplied no charge field.
	pub total_charge: f64,
	/// ISO 4217 currency code.
	pub currency: String,
	/// Business days in transit, when the carrier provided a parseable estimate.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transit_days: Option<u32>,
	/// Carrier that produced the quote.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub carrier: Option<CarrierId>,
}
impl RateQuote {
	pub(crate) fn new(
		service_name: String,
		service_code: String,
		total_charge: f64,
		currency: String,
		transit_days: Option<u32>,
		carrier: Option<CarrierId>,
	) -> Self {
		Self { service_name, service_code, total_charge, currency, transit_days, carrier }
	}
}

/// Ordered quotes for one carrier call.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RateResponse {
	/// Quotes in the order the carrier returned them.
	pub quotes: Vec<RateQuote>,
	/// Carrier correlation/request identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_id: Option<String>,
}
impl RateResponse {
	pub(crate) fn new(quotes: Vec<RateQuote>, request_id: Option<String>) -> Self {
		Self { quotes, request_id }
	}
}
