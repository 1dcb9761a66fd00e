//! Package dimensions, weight and their units.

// self
use crate::_prelude::*;

/// Unit for package dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionUnit {
	/// Inches.
	#[serde(rename = "in")]
	Inch,
	/// Centimeters.
	#[serde(rename = "cm")]
	Centimeter,
}
impl DimensionUnit {
	/// Returns the label accepted in caller input.
	pub const fn as_str(self) -> &'static str {
		match self {
			DimensionUnit::Inch => "in",
			DimensionUnit::Centimeter => "cm",
		}
	}
}

/// Unit for package weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
	/// Pounds.
	#[serde(rename = "lb")]
	Pound,
	/// Kilograms.
	#[serde(rename = "kg")]
	Kilogram,
}
impl WeightUnit {
	/// Returns the label accepted in caller input.
	pub const fn as_str(self) -> &'static str {
		match self {
			WeightUnit::Pound => "lb",
			WeightUnit::Kilogram => "kg",
		}
	}
}

/// A single parcel with positive dimensions and weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
	/// Length in `dimension_unit`.
	pub length: f64,
	/// Width in `dimension_unit`.
	pub width: f64,
	/// Height in `dimension_unit`.
	pub height: f64,
	/// Unit shared by the three dimensions.
	pub dimension_unit: DimensionUnit,
	/// Weight in `weight_unit`.
	pub weight: f64,
	/// Unit for `weight`.
	pub weight_unit: WeightUnit,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn units_use_lowercase_labels() {
		let package: Package = serde_json::from_value(serde_json::json!({
			"length": 10,
			"width": 8.5,
			"height": 4,
			"dimensionUnit": "cm",
			"weight": 2.25,
			"weightUnit": "kg",
		}))
		.expect("Package fixture should deserialize.");

		assert_eq!(package.dimension_unit, DimensionUnit::Centimeter);
		assert_eq!(package.weight_unit.as_str(), "kg");
		assert!(
			serde_json::from_value::<DimensionUnit>(serde_json::json!("mm")).is_err(),
			"Unknown units must be rejected."
		);
	}
}
