//! UPS rating call: token, encode, send, classify.

// self
use crate::{
	_prelude::*,
	auth::TokenCache,
	carrier::{
		RateCapability, RateFuture,
		ups::{
			UpsConfig,
			mapper::{self, EncodeContext},
		},
	},
	domain::{CarrierId, RateRequest, RateResponse},
	http::{self, HttpRequest, HttpResponse, HttpTransport},
	obs::{self, OperationKind},
};

const TARGET: &str = "UPS rating endpoint";

/// Rate capability backed by the UPS Rating API.
pub struct UpsRateOperation<T>
where
	T: ?Sized + HttpTransport,
{
	carrier: CarrierId,
	config: Arc<UpsConfig>,
	transport: Arc<T>,
	tokens: Arc<TokenCache<T>>,
}
impl<T> UpsRateOperation<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates an operation sharing `transport` and `tokens` with its adapter.
	pub fn new(
		carrier: CarrierId,
		config: Arc<UpsConfig>,
		transport: Arc<T>,
		tokens: Arc<TokenCache<T>>,
	) -> Self {
		Self { carrier, config, transport, tokens }
	}

	/// Requests quotes for `request`.
	///
	/// A 401 or 403 from UPS invalidates the cached token before the failure is returned, so
	/// the next call re-authenticates.
	pub async fn get_rates(&self, request: &RateRequest) -> Result<RateResponse> {
		obs::observe(OperationKind::Rate, &self.carrier, self.execute(request)).await
	}

	async fn execute(&self, request: &RateRequest) -> Result<RateResponse> {
		let token = self.tokens.get_valid_token().await?;
		let transaction_id = new_transaction_id();
		let encoded = mapper::encode(
			request,
			&EncodeContext {
				api_version: &self.config.api_version,
				shipper_number: self.config.shipper_number.as_deref(),
				transaction_id: &transaction_id,
			},
		);
		let body = serde_json::to_string(&encoded.payload).map_err(|err| {
			Error::validation(format!("Rate request could not be encoded: {err}"))
		})?;
		let http_request = HttpRequest::post(self.config.endpoint(&encoded.path))
			.with_header("Authorization", format!("Bearer {}", token.expose()))
			.with_header("transId", transaction_id.as_str())
			.with_header("transactionSrc", self.config.transaction_source.as_str())
			.with_header("Content-Type", "application/json")
			.with_header("Accept", "application/json")
			.with_body(body)
			.with_timeout(self.config.request_timeout);
		let response = self
			.transport
			.send(http_request)
			.await
			.map_err(|err| err.into_error(TARGET).with_request_id(transaction_id.as_str()))?;

		self.classify(response, transaction_id)
	}

	fn classify(&self, response: HttpResponse, transaction_id: String) -> Result<RateResponse> {
		let status = response.status;

		match status {
			401 | 403 => {
				self.tokens.invalidate_token();

				Err(Error::auth_failed(
					format!("{TARGET} rejected the bearer token (HTTP {status})."),
					Some(status),
				)
				.with_request_id(transaction_id))
			},
			429 => Err(Error::rate_limited(TARGET, response.retry_after_secs())
				.with_request_id(transaction_id)),
			400 => {
				let detail = mapper::parse_error_detail(&response.body).unwrap_or_default();
				let message = failure_message("rejected the rate request", &detail, &response);

				Err(Error::invalid_request(message, detail).with_request_id(transaction_id))
			},
			_ if !response.is_success() => {
				let detail = mapper::parse_error_detail(&response.body).unwrap_or_default();
				let message =
					failure_message(&format!("returned HTTP {status}"), &detail, &response);

				Err(Error::carrier(message, status, detail).with_request_id(transaction_id))
			},
			_ => match mapper::decode(&response.body, &self.carrier) {
				Ok(mut decoded) => {
					decoded.request_id.get_or_insert(transaction_id);

					Ok(decoded)
				},
				Err(err) => Err(Error::malformed_response(format!("{TARGET}: {err}"), err)
					.with_request_id(transaction_id)),
			},
		}
	}
}
impl<T> RateCapability for UpsRateOperation<T>
where
	T: ?Sized + HttpTransport,
{
	fn get_rates<'a>(&'a self, request: &'a RateRequest) -> RateFuture<'a> {
		Box::pin(UpsRateOperation::get_rates(self, request))
	}
}
impl<T> Debug for UpsRateOperation<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UpsRateOperation")
			.field("carrier", &self.carrier)
			.field("base_url", &self.config.base_url.as_str())
			.finish()
	}
}

fn failure_message(
	what: &str,
	detail: &crate::error::CarrierDetail,
	response: &HttpResponse,
) -> String {
	match (&detail.code, &detail.message) {
		(Some(code), Some(message)) => format!("{TARGET} {what}: {message} ({code})."),
		(None, Some(message)) => format!("{TARGET} {what}: {message}."),
		_ => format!("{TARGET} {what}: {}", http::body_excerpt(&response.body)),
	}
}

// 32 lowercase hex characters, as accepted by the `transId` header.
fn new_transaction_id() -> String {
	format!("{:032x}", rand::random::<u128>())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transaction_ids_are_32_hex_chars() {
		let first = new_transaction_id();
		let second = new_transaction_id();

		assert_eq!(first.len(), 32);
		assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
		assert_ne!(first, second);
	}

	#[test]
	fn failure_message_prefers_native_detail() {
		let response = HttpResponse::new(400, r#"{"response":{"errors":[]}}"#);
		let detail = crate::error::CarrierDetail {
			code: Some("111210".into()),
			message: Some("Invalid postal code".into()),
		};

		assert_eq!(
			failure_message("rejected the rate request", &detail, &response),
			"UPS rating endpoint rejected the rate request: Invalid postal code (111210)."
		);
		assert!(
			failure_message("returned HTTP 502", &Default::default(), &response)
				.ends_with(r#"{"response":{"errors":[]}}"#)
		);
	}
}
