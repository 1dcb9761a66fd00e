//! Carrier integration engine: validate shipping-rate requests, quote them against carrier APIs
//! behind cached client-credentials tokens, and report every failure in one closed taxonomy.
//!
//! The entry point is [`service::IntegrationService`], which routes validated requests to
//! registered [`carrier::CarrierAdapter`]s. [`carrier::ups::UpsAdapter`] is the bundled UPS
//! implementation; its HTTP stack is any [`http::HttpTransport`] (reqwest by default).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod carrier;
pub mod domain;
pub mod error;
pub mod http;
pub mod obs;
pub mod service;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use async_lock::{Mutex as AsyncMutex, MutexGuardArc};
	use serde_json::{Value, json};
	// self
	use crate::{
		carrier::ups::UpsConfig,
		http::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportFuture},
	};

	/// Client id used by test configs.
	pub const TEST_CLIENT_ID: &str = "test-client";
	/// Client secret used by test configs.
	pub const TEST_CLIENT_SECRET: &str = "test-secret";

	/// One scripted transport outcome.
	#[derive(Debug)]
	pub enum Scripted {
		/// Resolve with a response.
		Respond(HttpResponse),
		/// Fail without a response.
		Fail(TransportError),
	}

	/// Queue-driven [`HttpTransport`] that records every request.
	///
	/// Outcomes are served in push order. [`ScriptedTransport::hold`] pauses every pending call
	/// (after it was recorded) until the returned guard is dropped.
	#[derive(Debug, Default)]
	pub struct ScriptedTransport {
		script: Mutex<VecDeque<Scripted>>,
		requests: Mutex<Vec<HttpRequest>>,
		gate: Arc<AsyncMutex<()>>,
	}
	impl ScriptedTransport {
		/// Creates an empty transport.
		pub fn new() -> Self {
			Self::default()
		}

		/// Queues a response.
		pub fn push_response(&self, response: HttpResponse) -> &Self {
			self.script.lock().push_back(Scripted::Respond(response));

			self
		}

		/// Queues a JSON response with `status`.
		pub fn push_json(&self, status: u16, body: Value) -> &Self {
			self.push_response(
				HttpResponse::new(status, body.to_string())
					.with_header("content-type", "application/json"),
			)
		}

		/// Queues a transport failure.
		pub fn push_error(&self, err: TransportError) -> &Self {
			self.script.lock().push_back(Scripted::Fail(err));

			self
		}

		/// Pauses calls until the guard is dropped.
		pub async fn hold(&self) -> MutexGuardArc<()> {
			self.gate.lock_arc().await
		}

		/// Returns a copy of every recorded request.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}

		/// Counts recorded requests whose path ends with `suffix`.
		pub fn count_path(&self, suffix: &str) -> usize {
			let requests = self.requests.lock();

			requests.iter().filter(|request| request.url.path().ends_with(suffix)).count()
		}

		/// Counts every recorded request.
		pub fn request_count(&self) -> usize {
			self.requests.lock().len()
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			Box::pin(async move {
				drop(self.gate.lock().await);

				match self.script.lock().pop_front() {
					Some(Scripted::Respond(response)) => Ok(response),
					Some(Scripted::Fail(err)) => Err(err),
					None => Err(TransportError::Aborted { reason: "script exhausted".into() }),
				}
			})
		}
	}

	/// Builds a UPS config pointed at `base_url`.
	pub fn ups_config(base_url: &str) -> UpsConfig {
		UpsConfig::builder(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.base_url(Url::parse(base_url).expect("Test base URL should parse."))
			.build()
			.expect("Test UPS config should build.")
	}

	/// Token endpoint body in the UPS shape (`expires_in` as text).
	pub fn token_body(access_token: &str, expires_in: u64) -> Value {
		json!({
			"token_type": "Bearer",
			"access_token": access_token,
			"expires_in": expires_in.to_string(),
			"status": "approved",
		})
	}

	/// Well-formed raw rate input (shop mode).
	pub fn rate_input() -> Value {
		json!({
			"origin": {
				"name": "Warehouse",
				"addressLines": ["100 Peachtree St NW"],
				"city": "Atlanta",
				"stateProvinceCode": "GA",
				"postalCode": "30303",
				"countryCode": "US",
			},
			"destination": {
				"addressLines": ["22 Bull St", "Apt 4"],
				"city": "Savannah",
				"stateProvinceCode": "GA",
				"postalCode": "31401",
				"countryCode": "US",
				"residential": true,
			},
			"package": {
				"length": 12,
				"width": 10,
				"height": 6,
				"dimensionUnit": "in",
				"weight": 5.5,
				"weightUnit": "lb",
			},
		})
	}

	/// Shop response with a Ground and a Next Day Air quote.
	pub fn shop_response_body() -> Value {
		json!({
			"RateResponse": {
				"Response": {
					"ResponseStatus": { "Code": "1", "Description": "Success" },
					"TransactionReference": { "TransactionIdentifier": "ups-tx-123" },
				},
				"RatedShipment": [
					{
						"Service": { "Code": "03", "Description": "" },
						"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "15.25" },
						"GuaranteedDelivery": { "BusinessDaysInTransit": "3" },
					},
					{
						"Service": { "Code": "01", "Description": "" },
						"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "62.10" },
						"GuaranteedDelivery": { "BusinessDaysInTransit": "1" },
					},
				],
			}
		})
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
