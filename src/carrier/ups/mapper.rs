//! Pure translation between the domain model and UPS rating payloads.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	carrier::ups::wire::{
		self, CodeDescription, CustomerReference, Dimensions, PackageWeight, Party,
		RateRequestBody, RateRequestEnvelope, RatedShipment, RequestInfo, ShipmentRatingOptions,
		WireAddress, WirePackage,
	},
	domain::{
		Address, CarrierId, DimensionUnit, Package, RateQuote, RateRequest, RateResponse,
		WeightUnit,
	},
	error::CarrierDetail,
};

const CUSTOMER_SUPPLIED_PACKAGE: &str = "02";
const DEFAULT_CURRENCY: &str = "USD";

/// Rating mode, which selects both the request option and the resource path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOption {
	/// Quote every available service.
	Shop,
	/// Quote one named service.
	Rate,
}
impl RequestOption {
	/// Returns the literal used in the body and path.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOption::Shop => "Shop",
			RequestOption::Rate => "Rate",
		}
	}
}
impl Display for RequestOption {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Per-call values that are not part of the domain request.
#[derive(Clone, Copy, Debug)]
pub struct EncodeContext<'a> {
	/// Rating API version segment.
	pub api_version: &'a str,
	/// Shipper account number, when configured.
	pub shipper_number: Option<&'a str>,
	/// Correlation id sent as `transId` and `CustomerContext`.
	pub transaction_id: &'a str,
}

/// Encoded rating call.
#[derive(Clone, Debug)]
pub struct EncodedRate {
	/// Selected mode.
	pub option: RequestOption,
	/// Resource path relative to the API base URL.
	pub path: String,
	/// Request payload.
	pub payload: RateRequestEnvelope,
}

/// Failure to decode a rating response body.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// The body is not valid JSON.
	#[error("Malformed JSON in UPS rating response.")]
	MalformedJson(#[source] serde_json::Error),
	/// The JSON does not have the rating response shape.
	#[error("Unexpected UPS rating response shape at `{path}`.")]
	Shape {
		/// Path to the offending value.
		path: String,
		/// Underlying serde failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Encodes `request` into a UPS rating call.
///
/// A request without a service code shops all services; a service code switches to rate mode
/// for that service. Address text is clipped to the UPS field limits.
pub fn encode(request: &RateRequest, ctx: &EncodeContext<'_>) -> EncodedRate {
	let service = request.requested_service().map(|code| {
		let description = request
			.service_level
			.as_ref()
			.and_then(|filter| filter.description.clone())
			.filter(|description| !description.trim().is_empty())
			.or_else(|| service_name(code).map(str::to_owned));

		CodeDescription { code: code.to_owned(), description }
	});
	let option = if service.is_some() { RequestOption::Rate } else { RequestOption::Shop };
	let shipper = Party {
		shipper_number: ctx.shipper_number.map(str::to_owned),
		..party(&request.origin)
	};
	let payload = RateRequestEnvelope {
		rate_request: RateRequestBody {
			request: RequestInfo {
				request_option: option.as_str().to_owned(),
				transaction_reference: CustomerReference {
					customer_context: ctx.transaction_id.to_owned(),
				},
			},
			shipment: wire::Shipment {
				shipper,
				ship_to: party(&request.destination),
				ship_from: party(&request.origin),
				service,
				package: package(&request.package),
				shipment_rating_options: ctx.shipper_number.map(|_| ShipmentRatingOptions {
					negotiated_rates_indicator: String::new(),
				}),
			},
		},
	};

	EncodedRate {
		option,
		path: format!("api/rating/{}/{}", ctx.api_version, option.as_str()),
		payload,
	}
}

/// Decodes a successful rating response body into quotes tagged with `carrier`.
///
/// Quotes keep the order of the rated shipments in the body. A body without rated shipments
/// yields an empty quote list.
pub fn decode(body: &str, carrier: &CarrierId) -> Result<RateResponse, DecodeError> {
	let value = serde_json::from_str::<Value>(body).map_err(DecodeError::MalformedJson)?;
	let envelope = serde_path_to_error::deserialize::<_, wire::RateResponseEnvelope>(value)
		.map_err(|err| {
			let path = err.path().to_string();

			DecodeError::Shape { path, source: err.into_inner() }
		})?;
	let body = envelope.rate_response;
	let request_id = body
		.response
		.and_then(|info| info.transaction_reference)
		.and_then(|reference| reference.transaction_identifier)
		.filter(|id| !id.is_empty());
	let quotes = body
		.rated_shipment
		.map(wire::OneOrMany::into_vec)
		.unwrap_or_default()
		.into_iter()
		.filter_map(|shipment| quote(shipment, carrier))
		.collect();

	Ok(RateResponse::new(quotes, request_id))
}

/// Extracts the first native code/message from a UPS error body.
pub fn parse_error_detail(body: &str) -> Option<CarrierDetail> {
	let envelope = serde_json::from_str::<wire::ErrorEnvelope>(body).ok()?;
	let first = envelope.response?.errors.into_iter().next()?;

	if first.code.is_none() && first.message.is_none() {
		return None;
	}

	Some(CarrierDetail { code: first.code, message: first.message })
}

/// Returns the well-known name of a UPS service code.
pub fn service_name(code: &str) -> Option<&'static str> {
	let name = match code {
		"01" => "UPS Next Day Air",
		"02" => "UPS 2nd Day Air",
		"03" => "UPS Ground",
		"07" => "UPS Worldwide Express",
		"08" => "UPS Worldwide Expedited",
		"11" => "UPS Standard",
		"12" => "UPS 3 Day Select",
		"13" => "UPS Next Day Air Saver",
		"14" => "UPS Next Day Air Early",
		"54" => "UPS Worldwide Express Plus",
		"59" => "UPS 2nd Day Air A.M.",
		"65" => "UPS Saver",
		_ => return None,
	};

	Some(name)
}

fn quote(shipment: RatedShipment, carrier: &CarrierId) -> Option<RateQuote> {
	let service = shipment.service.unwrap_or_default();
	let (total_charge, currency) = [
		shipment.negotiated_rate_charges.and_then(|negotiated| negotiated.total_charge),
		shipment.total_charges,
		shipment.transportation_charges,
	]
	.into_iter()
	.flatten()
	.find_map(|charge| {
		let amount = charge.monetary_value.as_ref().and_then(parse_amount)?;

		Some((amount, charge.currency_code.filter(|code| !code.is_empty())))
	})
	.unwrap_or((0.0, None));

	if !total_charge.is_finite() || total_charge < 0.0 {
		return None;
	}

	let name = service
		.description
		.filter(|description| !description.trim().is_empty())
		.or_else(|| service_name(&service.code).map(str::to_owned))
		.unwrap_or_else(|| format!("UPS {}", service.code));
	let transit_days = shipment
		.guaranteed_delivery
		.and_then(|delivery| delivery.business_days_in_transit)
		.as_ref()
		.and_then(parse_days);

	Some(RateQuote::new(
		name,
		service.code,
		total_charge,
		currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
		transit_days,
		Some(carrier.clone()),
	))
}

fn parse_amount(value: &Value) -> Option<f64> {
	match value {
		Value::String(text) => text.trim().parse::<f64>().ok(),
		Value::Number(number) => number.as_f64(),
		_ => None,
	}
}

fn parse_days(value: &Value) -> Option<u32> {
	match value {
		Value::String(text) => text.trim().parse::<u32>().ok(),
		Value::Number(number) => number.as_u64().and_then(|days| u32::try_from(days).ok()),
		_ => None,
	}
}

fn party(address: &Address) -> Party {
	Party {
		name: address.name.as_deref().map(|name| clip(name, Address::NAME_MAX_LEN)),
		shipper_number: None,
		address: WireAddress {
			address_line: address
				.address_lines
				.iter()
				.take(Address::MAX_LINES)
				.map(|line| clip(line, Address::LINE_MAX_LEN))
				.collect(),
			city: clip(&address.city, Address::CITY_MAX_LEN),
			state_province_code: clip(&address.state_province_code, Address::STATE_MAX_LEN),
			postal_code: clip(&address.postal_code, Address::POSTAL_MAX_LEN),
			country_code: address.country_code.to_ascii_uppercase(),
			residential_address_indicator: address.is_residential().then(String::new),
		},
	}
}

fn package(package: &Package) -> WirePackage {
	let dimension_code = match package.dimension_unit {
		DimensionUnit::Inch => "IN",
		DimensionUnit::Centimeter => "CM",
	};
	let weight_code = match package.weight_unit {
		WeightUnit::Pound => "LBS",
		WeightUnit::Kilogram => "KGS",
	};

	WirePackage {
		packaging_type: CodeDescription::code(CUSTOMER_SUPPLIED_PACKAGE),
		dimensions: Dimensions {
			unit_of_measurement: CodeDescription::code(dimension_code),
			length: measure(package.length),
			width: measure(package.width),
			height: measure(package.height),
		},
		package_weight: PackageWeight {
			unit_of_measurement: CodeDescription::code(weight_code),
			weight: measure(package.weight),
		},
	}
}

fn clip(value: &str, max: usize) -> String {
	value.trim().chars().take(max).collect()
}

// At most two fractional digits, trailing zeros dropped.
fn measure(value: f64) -> String {
	let text = format!("{value:.2}");

	text.trim_end_matches('0').trim_end_matches('.').to_owned()
}
