//! Postal addresses and their field limits.

// self
use crate::_prelude::*;

/// Postal address used for both origin and destination.
///
/// Field limits are exposed as associated constants so mappers can clip wire values to the
/// same bounds the validator enforces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
	/// One to three street lines.
	pub address_lines: Vec<String>,
	/// City or locality.
	pub city: String,
	/// State or province code; may be empty for countries without subdivisions.
	#[serde(default)]
	pub state_province_code: String,
	/// Postal code.
	pub postal_code: String,
	/// ISO 3166-1 alpha-2 country code.
	pub country_code: String,
	/// Optional contact or company name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Marks a residential delivery point.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub residential: Option<bool>,
}
impl Address {
	/// Maximum number of street lines.
	pub const MAX_LINES: usize = 3;
	/// Maximum characters per street line.
	pub const LINE_MAX_LEN: usize = 35;
	/// Maximum characters in a city.
	pub const CITY_MAX_LEN: usize = 30;
	/// Maximum characters in a state/province code.
	pub const STATE_MAX_LEN: usize = 5;
	/// Maximum characters in a postal code.
	pub const POSTAL_MAX_LEN: usize = 15;
	/// Maximum characters in a name.
	pub const NAME_MAX_LEN: usize = 35;

	/// Returns `true` only when the residential flag is explicitly set.
	pub fn is_residential(&self) -> bool {
		self.residential.unwrap_or(false)
	}
}
