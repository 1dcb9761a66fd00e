//! Integration service facade: the public entry points for rating.
//!
//! The service validates raw caller input before any network call, routes the validated
//! request to a registered [`CarrierAdapter`], and returns the adapter's result unchanged.
//! Multi-carrier rating dispatches to every adapter in registration order and isolates
//! per-carrier failures.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	carrier::CarrierAdapter,
	domain::{self, CarrierId, RateQuote, RateRequest, RateResponse, ValidationIssue},
	error::ConfigError,
	obs::{self, OperationKind},
};

/// Per-call routing options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOptions {
	/// Target carrier; the configured default is used when absent.
	#[serde(default)]
	pub carrier_id: Option<String>,
}
impl RateOptions {
	/// Targets a specific carrier.
	pub fn carrier(carrier_id: impl Into<String>) -> Self {
		Self { carrier_id: Some(carrier_id.into()) }
	}
}

/// One carrier's failure during multi-carrier rating.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierFailure {
	/// Carrier that failed.
	pub carrier: CarrierId,
	/// Failure returned by that carrier.
	pub error: Error,
}

/// Aggregated outcome of [`IntegrationService::get_rates_from_all_carriers`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct MultiCarrierRates {
	/// Quotes from every successful carrier, tagged with their carrier and kept in
	/// registration order.
	pub quotes: Vec<RateQuote>,
	/// Failures, one per failing carrier.
	pub errors: Vec<CarrierFailure>,
}

/// Facade over every registered carrier adapter.
#[derive(Clone)]
pub struct IntegrationService {
	adapters: Vec<Arc<dyn CarrierAdapter>>,
	default_carrier: Option<CarrierId>,
}
impl IntegrationService {
	/// Starts an empty builder.
	pub fn builder() -> IntegrationServiceBuilder {
		IntegrationServiceBuilder::default()
	}

	/// Validates raw input without dispatching it.
	pub fn validate(&self, input: &Value) -> Result<RateRequest> {
		domain::validate(input)
	}

	/// Validates raw input and returns every field-level issue on failure.
	pub fn try_validate(&self, input: &Value) -> Result<RateRequest, Vec<ValidationIssue>> {
		domain::try_validate(input)
	}

	/// Returns the registered carrier ids in registration order.
	pub fn carriers(&self) -> impl Iterator<Item = &CarrierId> {
		self.adapters.iter().map(|adapter| adapter.carrier_id())
	}

	/// Returns the default carrier, if one was configured.
	pub fn default_carrier(&self) -> Option<&CarrierId> {
		self.default_carrier.as_ref()
	}

	/// Validates `input` and requests quotes from one carrier.
	///
	/// Invalid input and unknown carriers fail with a validation error before any network call.
	pub async fn get_rates(&self, input: &Value, options: RateOptions) -> Result<RateResponse> {
		let request = domain::validate(input)?;
		let adapter = self.resolve(options.carrier_id.as_deref())?;

		adapter.rate().get_rates(&request).await
	}

	/// Validates `input` once and requests quotes from every registered carrier in turn.
	///
	/// A failing carrier is recorded in [`MultiCarrierRates::errors`] and never stops the
	/// remaining carriers.
	pub async fn get_rates_from_all_carriers(&self, input: &Value) -> Result<MultiCarrierRates> {
		let request = domain::validate(input)?;

		obs::observe(OperationKind::RateAllCarriers, "*", async {
			let mut outcome = MultiCarrierRates::default();

			for adapter in &self.adapters {
				let carrier = adapter.carrier_id();

				match adapter.rate().get_rates(&request).await {
					Ok(response) => outcome.quotes.extend(response.quotes.into_iter().map(
						|mut quote| {
							quote.carrier = Some(carrier.clone());

							quote
						},
					)),
					Err(error) =>
						outcome.errors.push(CarrierFailure { carrier: carrier.clone(), error }),
				}
			}

			Ok(outcome)
		})
		.await
	}

	/// Drops the cached token of `carrier_id`.
	pub fn invalidate_token(&self, carrier_id: &str) -> Result<()> {
		self.resolve(Some(carrier_id))?.invalidate_token();

		Ok(())
	}

	fn resolve(&self, carrier_id: Option<&str>) -> Result<&Arc<dyn CarrierAdapter>> {
		let Some(id) = carrier_id.or(self.default_carrier.as_deref()) else {
			return Err(Error::validation(
				"No carrier specified and no default carrier is configured.",
			));
		};

		self.adapters
			.iter()
			.find(|adapter| adapter.carrier_id().as_ref() == id)
			.ok_or_else(|| Error::validation(format!("Unknown carrier `{id}`.")))
	}
}
impl Debug for IntegrationService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IntegrationService")
			.field("carriers", &self.carriers().collect::<Vec<_>>())
			.field("default_carrier", &self.default_carrier)
			.finish()
	}
}

/// Builder for [`IntegrationService`].
#[derive(Default)]
pub struct IntegrationServiceBuilder {
	adapters: Vec<Arc<dyn CarrierAdapter>>,
	default_carrier: Option<String>,
}
impl IntegrationServiceBuilder {
	/// Registers an adapter; registration order drives multi-carrier dispatch.
	pub fn register(mut self, adapter: impl 'static + CarrierAdapter) -> Self {
		self.adapters.push(Arc::new(adapter));

		self
	}

	/// Registers an already shared adapter.
	pub fn register_shared(mut self, adapter: Arc<dyn CarrierAdapter>) -> Self {
		self.adapters.push(adapter);

		self
	}

	/// Sets the carrier used when a call does not name one.
	pub fn default_carrier(mut self, carrier_id: impl Into<String>) -> Self {
		self.default_carrier = Some(carrier_id.into());

		self
	}

	/// Validates registrations and produces the service.
	pub fn build(self) -> Result<IntegrationService, ConfigError> {
		let mut seen = HashSet::with_capacity(self.adapters.len());

		for adapter in &self.adapters {
			if !seen.insert(adapter.carrier_id().clone()) {
				return Err(ConfigError::DuplicateCarrier {
					carrier: adapter.carrier_id().to_string(),
				});
			}
		}

		let default_carrier = match self.default_carrier {
			Some(raw) => {
				let id = CarrierId::new(&raw)?;

				if !seen.contains(&id) {
					return Err(ConfigError::UnknownDefaultCarrier { carrier: raw });
				}

				Some(id)
			},
			None => None,
		};

		Ok(IntegrationService { adapters: self.adapters, default_carrier })
	}
}
impl Debug for IntegrationServiceBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IntegrationServiceBuilder")
			.field("carriers", &self.adapters.len())
			.field("default_carrier", &self.default_carrier)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		carrier::{RateCapability, RateFuture},
		error::ErrorKind,
	};

	struct Fixed {
		id: CarrierId,
		outcome: Result<Vec<&'static str>>,
	}
	impl Fixed {
		fn ok(id: &str, services: Vec<&'static str>) -> Self {
			Self {
				id: CarrierId::new(id).expect("Carrier fixture should be valid."),
				outcome: Ok(services),
			}
		}

		fn failing(id: &str) -> Self {
			Self {
				id: CarrierId::new(id).expect("Carrier fixture should be valid."),
				outcome: Err(Error::timeout("Carrier did not respond in time.")),
			}
		}
	}
	impl RateCapability for Fixed {
		fn get_rates<'a>(&'a self, _: &'a RateRequest) -> RateFuture<'a> {
			Box::pin(async move {
				let services = self.outcome.clone()?;
				let quotes = services
					.into_iter()
					.map(|code| {
						let name = format!("Service {code}");

						RateQuote::new(name, code.into(), 1.0, "USD".into(), None, None)
					})
					.collect();

				Ok(RateResponse::new(quotes, None))
			})
		}
	}
	impl CarrierAdapter for Fixed {
		fn carrier_id(&self) -> &CarrierId {
			&self.id
		}

		fn rate(&self) -> &dyn RateCapability {
			self
		}

		fn invalidate_token(&self) {}
	}

	fn input() -> Value {
		serde_json::json!({
			"origin": {
				"addressLines": ["1 Main St"],
				"city": "Atlanta",
				"stateProvinceCode": "GA",
				"postalCode": "30303",
				"countryCode": "US",
			},
			"destination": {
				"addressLines": ["2 Bay St"],
				"city": "Savannah",
				"stateProvinceCode": "GA",
				"postalCode": "31401",
				"countryCode": "US",
			},
			"package": {
				"length": 10,
				"width": 8,
				"height": 4,
				"dimensionUnit": "in",
				"weight": 2,
				"weightUnit": "lb",
			},
		})
	}

	#[test]
	fn build_rejects_duplicates_and_unknown_default() {
		let duplicate = IntegrationService::builder()
			.register(Fixed::ok("ups", vec![]))
			.register(Fixed::ok("ups", vec![]))
			.build();

		assert!(matches!(duplicate, Err(ConfigError::DuplicateCarrier { .. })));

		let unknown = IntegrationService::builder()
			.register(Fixed::ok("ups", vec![]))
			.default_carrier("fedex")
			.build();

		assert!(matches!(unknown, Err(ConfigError::UnknownDefaultCarrier { .. })));

		let invalid = IntegrationService::builder()
			.register(Fixed::ok("ups", vec![]))
			.default_carrier("u p s")
			.build();

		assert!(matches!(invalid, Err(ConfigError::InvalidCarrierId(_))));
	}

	#[tokio::test]
	async fn routes_to_default_or_named_carrier() {
		let service = IntegrationService::builder()
			.register(Fixed::ok("ups", vec!["03"]))
			.register(Fixed::ok("fedex", vec!["GROUND"]))
			.default_carrier("ups")
			.build()
			.expect("Service should build.");
		let by_default = service
			.get_rates(&input(), RateOptions::default())
			.await
			.expect("Default carrier should quote.");
		let named = service
			.get_rates(&input(), RateOptions::carrier("fedex"))
			.await
			.expect("Named carrier should quote.");

		assert_eq!(by_default.quotes[0].service_code, "03");
		assert_eq!(named.quotes[0].service_code, "GROUND");
	}

	#[tokio::test]
	async fn unresolved_carriers_are_validation_errors() {
		let service = IntegrationService::builder()
			.register(Fixed::ok("ups", vec!["03"]))
			.build()
			.expect("Service should build.");
		let missing = service
			.get_rates(&input(), RateOptions::default())
			.await
			.expect_err("Missing default must fail.");
		let unknown = service
			.get_rates(&input(), RateOptions::carrier("dhl"))
			.await
			.expect_err("Unknown carrier must fail.");

		assert_eq!(missing.kind, ErrorKind::ValidationError);
		assert_eq!(unknown.kind, ErrorKind::ValidationError);
		assert!(unknown.message.contains("dhl"));
		assert!(service.invalidate_token("dhl").is_err());
		assert!(service.invalidate_token("ups").is_ok());
	}

	#[tokio::test]
	async fn fan_out_isolates_failures_and_tags_quotes() {
		let service = IntegrationService::builder()
			.register(Fixed::ok("ups", vec!["03", "02"]))
			.register(Fixed::failing("dhl"))
			.register(Fixed::ok("fedex", vec!["GROUND"]))
			.build()
			.expect("Service should build.");
		let outcome = service
			.get_rates_from_all_carriers(&input())
			.await
			.expect("Fan-out should succeed with partial failures.");
		let tagged = outcome
			.quotes
			.iter()
			.map(|quote| (quote.carrier.as_deref(), quote.service_code.as_str()))
			.collect::<Vec<_>>();

		assert_eq!(tagged, [(Some("ups"), "03"), (Some("ups"), "02"), (Some("fedex"), "GROUND")]);
		assert_eq!(outcome.errors.len(), 1);
		assert_eq!(outcome.errors[0].carrier.as_ref(), "dhl");
		assert_eq!(outcome.errors[0].error.kind, ErrorKind::Timeout);
	}

	#[tokio::test]
	async fn invalid_input_fails_before_dispatch() {
		let service = IntegrationService::builder()
			.register(Fixed::ok("ups", vec!["03"]))
			.default_carrier("ups")
			.build()
			.expect("Service should build.");
		let mut bad = input();

		bad["origin"]["addressLines"] = serde_json::json!([]);

		let err = service
			.get_rates_from_all_carriers(&bad)
			.await
			.expect_err("Empty address lines must fail validation.");

		assert_eq!(err.kind, ErrorKind::ValidationError);
		assert!(err.message.contains("origin.addressLines"));
	}
}
