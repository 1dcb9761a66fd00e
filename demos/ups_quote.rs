//! Quotes a parcel against a mocked UPS sandbox through the integration service.
//!
//! The first call acquires a client-credentials token and the second reuses it, so the token
//! endpoint is hit exactly once.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use carrier_integration::{
	carrier::ups::{UpsAdapter, UpsConfig},
	service::{IntegrationService, RateOptions},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/security/v1/oauth/token");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"token_type": "Bearer",
				"access_token": "demo-access",
				"expires_in": "14399",
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/rating/v2403/Shop");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"RateResponse": {
					"Response": {
						"TransactionReference": { "TransactionIdentifier": "demo-tx" },
					},
					"RatedShipment": {
						"Service": { "Code": "03" },
						"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "18.40" },
						"GuaranteedDelivery": { "BusinessDaysInTransit": "2" },
					},
				}
			}));
		})
		.await;

	let config = UpsConfig::builder("demo-client", "demo-secret")
		.base_url(Url::parse(&server.base_url())?)
		.build()?;
	let service = IntegrationService::builder()
		.register(UpsAdapter::from_config(config)?)
		.default_carrier("ups")
		.build()?;
	let input = json!({
		"origin": {
			"addressLines": ["100 Peachtree St NW"],
			"city": "Atlanta",
			"stateProvinceCode": "GA",
			"postalCode": "30303",
			"countryCode": "US",
		},
		"destination": {
			"addressLines": ["1 Infinite Loop"],
			"city": "Cupertino",
			"stateProvinceCode": "CA",
			"postalCode": "95014",
			"countryCode": "US",
		},
		"package": {
			"length": 10,
			"width": 8,
			"height": 4,
			"dimensionUnit": "in",
			"weight": 5.5,
			"weightUnit": "lb",
		},
	});

	for _ in 0..2 {
		let response = service.get_rates(&input, RateOptions::default()).await?;

		for quote in &response.quotes {
			println!(
				"{} ({}): {:.2} {} in {:?} day(s).",
				quote.service_name,
				quote.service_code,
				quote.total_charge,
				quote.currency,
				quote.transit_days,
			);
		}
	}

	token_mock.assert_async().await;

	Ok(())
}
