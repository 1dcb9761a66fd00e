//! Carrier identifiers used as registration keys.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Identifier a carrier adapter is registered under (e.g. `ups`).
///
/// Identifiers are case-sensitive slugs: ASCII letters, digits, `-`, `_` and `.`, at most
/// [`CarrierId::MAX_LEN`] characters.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CarrierId(String);
impl CarrierId {
	/// Longest accepted identifier.
	pub const MAX_LEN: usize = 64;

	/// Validates `value` as a carrier identifier.
	pub fn new(value: impl AsRef<str>) -> Result<Self, CarrierIdError> {
		let value = value.as_ref();

		check(value)?;

		Ok(Self(value.to_owned()))
	}
}
impl Deref for CarrierId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for CarrierId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for CarrierId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<CarrierId> for String {
	fn from(value: CarrierId) -> Self {
		value.0
	}
}
impl TryFrom<String> for CarrierId {
	type Error = CarrierIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		check(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for CarrierId {
	type Err = CarrierIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for CarrierId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Carrier({})", self.0)
	}
}
impl Display for CarrierId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Reason a carrier identifier was rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CarrierIdError {
	/// The identifier was empty.
	#[error("Carrier identifier cannot be empty.")]
	Empty,
	/// The identifier is longer than [`CarrierId::MAX_LEN`].
	#[error("Carrier identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier contains a character outside the slug alphabet.
	#[error("Carrier identifier contains {found:?}; use ASCII letters, digits, '-', '_' or '.'.")]
	InvalidCharacter {
		/// First offending character.
		found: char,
	},
}

fn check(value: &str) -> Result<(), CarrierIdError> {
	if value.is_empty() {
		return Err(CarrierIdError::Empty);
	}
	if value.len() > CarrierId::MAX_LEN {
		return Err(CarrierIdError::TooLong { max: CarrierId::MAX_LEN });
	}
	if let Some(found) =
		value.chars().find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')))
	{
		return Err(CarrierIdError::InvalidCharacter { found });
	}

	Ok(())
}
