//! Bearer token values and the redacting secret wrapper.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the secret is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer token plus the absolute instant at which the provider stops honoring it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedToken {
	/// Opaque bearer value.
	pub access_token: TokenSecret,
	/// Absolute expiry instant.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Creates a token that expires `expires_in` after `issued_at`.
	///
	/// Lifetimes past the representable range saturate at the latest supported instant.
	pub fn issued(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		let expires_at = issued_at
			.checked_add(expires_in)
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_offset(issued_at.offset()));

		Self { access_token: TokenSecret::new(access_token), expires_at }
	}

	/// Returns `true` while `now` is earlier than `expires_at - refresh_buffer`.
	pub fn is_fresh_at(&self, now: OffsetDateTime, refresh_buffer: Duration) -> bool {
		self.expires_at.checked_sub(refresh_buffer).is_some_and(|deadline| now < deadline)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn freshness_honors_refresh_buffer() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::issued("abc", issued, Duration::hours(1));
		let buffer = Duration::seconds(60);

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert!(token.is_fresh_at(macros::datetime!(2025-01-01 00:58:59 UTC), buffer));
		assert!(!token.is_fresh_at(macros::datetime!(2025-01-01 00:59 UTC), buffer));
		assert!(!token.is_fresh_at(macros::datetime!(2025-01-01 01:30 UTC), buffer));
		assert!(token.is_fresh_at(macros::datetime!(2025-01-01 00:59:30 UTC), Duration::ZERO));
	}

	#[test]
	fn oversized_lifetime_saturates() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::issued("abc", issued, Duration::seconds(i64::MAX));

		assert_eq!(token.expires_at, PrimitiveDateTime::MAX.assume_utc());
		assert!(token.is_fresh_at(issued, Duration::seconds(60)));
	}
}
