//! Serde models of the UPS Rating API payloads.
//!
//! Request types serialize exactly the fields the rating call needs. Response types are
//! tolerant: every field is optional and unknown fields are ignored, so only broken JSON or a
//! missing `RateResponse` envelope fails to decode.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Top-level rating request.
#[derive(Clone, Debug, Serialize)]
pub struct RateRequestEnvelope {
	/// Request body.
	#[serde(rename = "RateRequest")]
	pub rate_request: RateRequestBody,
}

/// Rating request body.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateRequestBody {
	/// Request option and correlation data.
	pub request: RequestInfo,
	/// Shipment being rated.
	pub shipment: Shipment,
}

/// `Request` block.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestInfo {
	/// `Shop` or `Rate`.
	pub request_option: String,
	/// Caller correlation data echoed back by UPS.
	pub transaction_reference: CustomerReference,
}

/// Outbound `TransactionReference`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerReference {
	/// Correlation id.
	pub customer_context: String,
}

/// `Shipment` block.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shipment {
	/// Shipper party.
	pub shipper: Party,
	/// Destination party.
	pub ship_to: Party,
	/// Origin party.
	pub ship_from: Party,
	/// Requested service (rate mode only).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub service: Option<CodeDescription>,
	/// The single package.
	pub package: WirePackage,
	/// Present when negotiated rates are requested.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shipment_rating_options: Option<ShipmentRatingOptions>,
}

/// Shipper, ship-to or ship-from party.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party {
	/// Party name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Shipper account number (shipper only).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shipper_number: Option<String>,
	/// Postal address.
	pub address: WireAddress,
}

/// Postal address.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAddress {
	/// Street lines.
	pub address_line: Vec<String>,
	/// City.
	pub city: String,
	/// State or province code.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub state_province_code: String,
	/// Postal code.
	pub postal_code: String,
	/// ISO country code.
	pub country_code: String,
	/// Empty-string literal flag, present only for residential addresses.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub residential_address_indicator: Option<String>,
}

/// Code/description pair used by several UPS blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDescription {
	/// Code.
	#[serde(default)]
	pub code: String,
	/// Description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl CodeDescription {
	/// Creates a pair without description.
	pub fn code(code: impl Into<String>) -> Self {
		Self { code: code.into(), description: None }
	}
}

/// `Package` block.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WirePackage {
	/// Packaging type code.
	pub packaging_type: CodeDescription,
	/// Outer dimensions.
	pub dimensions: Dimensions,
	/// Billable weight.
	pub package_weight: PackageWeight,
}

/// `Dimensions` block; values are decimal strings.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimensions {
	/// Unit code (`IN` or `CM`).
	pub unit_of_measurement: CodeDescription,
	/// Length.
	pub length: String,
	/// Width.
	pub width: String,
	/// Height.
	pub height: String,
}

/// `PackageWeight` block.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageWeight {
	/// Unit code (`LBS` or `KGS`).
	pub unit_of_measurement: CodeDescription,
	/// Weight as a decimal string.
	pub weight: String,
}

/// `ShipmentRatingOptions` block.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShipmentRatingOptions {
	/// Empty-string literal requesting negotiated rates.
	pub negotiated_rates_indicator: String,
}

/// Accepts either a single value or an array of values.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
	/// Array form.
	Many(Vec<T>),
	/// Single-object form.
	One(T),
}
impl<T> OneOrMany<T> {
	/// Flattens into a vector, preserving order.
	pub fn into_vec(self) -> Vec<T> {
		match self {
			OneOrMany::Many(values) => values,
			OneOrMany::One(value) => vec![value],
		}
	}
}

/// Top-level rating response.
#[derive(Clone, Debug, Deserialize)]
pub struct RateResponseEnvelope {
	/// Response body.
	#[serde(rename = "RateResponse")]
	pub rate_response: RateResponseBody,
}

/// Rating response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateResponseBody {
	/// Response metadata.
	#[serde(default)]
	pub response: Option<ResponseInfo>,
	/// Zero, one or many rated shipments.
	#[serde(default)]
	pub rated_shipment: Option<OneOrMany<RatedShipment>>,
}

/// `Response` metadata block.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseInfo {
	/// Correlation data.
	#[serde(default)]
	pub transaction_reference: Option<ResponseReference>,
}

/// Inbound `TransactionReference`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseReference {
	/// UPS-assigned transaction id.
	#[serde(default)]
	pub transaction_identifier: Option<String>,
}

/// One quoted service.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RatedShipment {
	/// Service code and description.
	#[serde(default)]
	pub service: Option<CodeDescription>,
	/// Published total.
	#[serde(default)]
	pub total_charges: Option<Charge>,
	/// Transportation-only charge.
	#[serde(default)]
	pub transportation_charges: Option<Charge>,
	/// Contract pricing.
	#[serde(default)]
	pub negotiated_rate_charges: Option<NegotiatedRateCharges>,
	/// Delivery commitment.
	#[serde(default)]
	pub guaranteed_delivery: Option<GuaranteedDelivery>,
}

/// Monetary amount. UPS sends the value as text; numbers are tolerated.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Charge {
	/// ISO currency code.
	#[serde(default)]
	pub currency_code: Option<String>,
	/// Amount.
	#[serde(default)]
	pub monetary_value: Option<Value>,
}

/// `NegotiatedRateCharges` block.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiatedRateCharges {
	/// Negotiated total.
	#[serde(default)]
	pub total_charge: Option<Charge>,
}

/// `GuaranteedDelivery` block.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuaranteedDelivery {
	/// Business days in transit, usually text.
	#[serde(default)]
	pub business_days_in_transit: Option<Value>,
}

/// Error body returned with non-2xx statuses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
	/// Error wrapper.
	#[serde(default)]
	pub response: Option<ErrorResponse>,
}

/// Error list wrapper.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorResponse {
	/// Errors reported by UPS.
	#[serde(default)]
	pub errors: Vec<ErrorItem>,
}

/// One UPS error.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorItem {
	/// Native error code.
	#[serde(default)]
	pub code: Option<String>,
	/// Native error message.
	#[serde(default)]
	pub message: Option<String>,
}
