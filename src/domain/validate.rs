//! Structural validation of caller input.
//!
//! Input arrives as untyped JSON. [`try_validate`] first maps it onto [`RateRequest`] (types and
//! enum membership, reported with the JSON path of the first mismatch) and then collects every
//! length/range violation. Nothing here touches the network or mutates the input.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	domain::{Address, Package, RateRequest, ServiceLevelFilter},
};

/// One field-level validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
	/// Dotted path of the offending field (e.g. `origin.addressLines[0]`).
	pub path: String,
	/// What is wrong with it.
	pub message: String,
}
impl ValidationIssue {
	fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self { path: path.into(), message: message.into() }
	}
}
impl Display for ValidationIssue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {}", self.path, self.message)
	}
}

/// Validates `input`, returning the typed request or a `VALIDATION_ERROR` whose message joins
/// every field-level issue.
pub fn validate(input: &Value) -> Result<RateRequest> {
	try_validate(input).map_err(|issues| {
		let joined = issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");

		Error::validation(format!("Invalid rate request: {joined}."))
	})
}

/// Validates `input` without producing a crate error.
pub fn try_validate(input: &Value) -> Result<RateRequest, Vec<ValidationIssue>> {
	let request: RateRequest = serde_path_to_error::deserialize(input).map_err(|err| {
		let path = err.path().to_string();
		let path = if path == "." { "input".to_owned() } else { path };

		vec![ValidationIssue::new(path, err.inner().to_string())]
	})?;
	let issues = check_request(&request);

	if issues.is_empty() { Ok(request) } else { Err(issues) }
}

/// Returns every constraint violation in an already-typed request.
pub fn check_request(request: &RateRequest) -> Vec<ValidationIssue> {
	let mut issues = Vec::new();

	check_address(&mut issues, "origin", &request.origin);
	check_address(&mut issues, "destination", &request.destination);
	check_package(&mut issues, &request.package);

	if let Some(filter) = &request.service_level {
		check_service_level(&mut issues, filter);
	}

	issues
}

fn check_address(issues: &mut Vec<ValidationIssue>, prefix: &str, address: &Address) {
	let lines = address.address_lines.len();

	if lines == 0 || lines > Address::MAX_LINES {
		issues.push(ValidationIssue::new(
			format!("{prefix}.addressLines"),
			format!("must contain between 1 and {} lines", Address::MAX_LINES),
		));
	}

	for (idx, line) in address.address_lines.iter().enumerate() {
		let path = format!("{prefix}.addressLines[{idx}]");

		check_text(issues, &path, line, 1, Address::LINE_MAX_LEN);
	}

	check_text(issues, &format!("{prefix}.city"), &address.city, 1, Address::CITY_MAX_LEN);
	check_text(
		issues,
		&format!("{prefix}.stateProvinceCode"),
		&address.state_province_code,
		0,
		Address::STATE_MAX_LEN,
	);
	check_text(
		issues,
		&format!("{prefix}.postalCode"),
		&address.postal_code,
		1,
		Address::POSTAL_MAX_LEN,
	);

	let country = &address.country_code;

	if country.chars().count() != 2 || !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
		issues.push(ValidationIssue::new(
			format!("{prefix}.countryCode"),
			"must be a two-letter ISO 3166-1 alpha-2 code",
		));
	}
	if let Some(name) = &address.name {
		check_text(issues, &format!("{prefix}.name"), name, 0, Address::NAME_MAX_LEN);
	}
}

fn check_package(issues: &mut Vec<ValidationIssue>, package: &Package) {
	for (field, value) in [
		("length", package.length),
		("width", package.width),
		("height", package.height),
		("weight", package.weight),
	] {
		if !(value.is_finite() && value > 0.) {
			issues.push(ValidationIssue::new(format!("package.{field}"), "must be positive"));
		}
	}
}

fn check_service_level(issues: &mut Vec<ValidationIssue>, filter: &ServiceLevelFilter) {
	if let Some(code) = &filter.code {
		check_text(issues, "serviceLevel.code", code, 1, ServiceLevelFilter::CODE_MAX_LEN);
	}
	if let Some(description) = &filter.description {
		check_text(
			issues,
			"serviceLevel.description",
			description,
			0,
			ServiceLevelFilter::DESCRIPTION_MAX_LEN,
		);
	}
}

// Lengths count the trimmed text, matching what reaches the wire.
fn check_text(issues: &mut Vec<ValidationIssue>, path: &str, value: &str, min: usize, max: usize) {
	let len = value.trim().chars().count();

	if len < min {
		issues.push(ValidationIssue::new(path, "must not be empty"));
	} else if len > max {
		issues.push(ValidationIssue::new(path, format!("must be at most {max} characters")));
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::error::ErrorKind;

	fn valid_input() -> Value {
		json!({
			"origin": {
				"addressLines": ["100 Main St"],
				"city": "Atlanta",
				"stateProvinceCode": "GA",
				"postalCode": "30301",
				"countryCode": "US",
			},
			"destination": {
				"addressLines": ["1 Infinite Loop", "Building 4"],
				"city": "Cupertino",
				"stateProvinceCode": "CA",
				"postalCode": "95014",
				"countryCode": "US",
				"residential": true,
			},
			"package": {
				"length": 10,
				"width": 8,
				"height": 4,
				"dimensionUnit": "in",
				"weight": 5.5,
				"weightUnit": "lb",
			},
		})
	}

	#[test]
	fn accepts_well_formed_input() {
		let request = validate(&valid_input()).expect("Fixture should validate.");

		assert_eq!(request.destination.address_lines.len(), 2);
		assert!(request.destination.is_residential());
		assert!(request.requested_service().is_none());
	}

	#[test]
	fn reports_type_errors_with_json_paths() {
		let mut input = valid_input();

		input["package"]["dimensionUnit"] = json!("mm");

		let issues = try_validate(&input).expect_err("Unknown units must be rejected.");

		assert_eq!(issues.len(), 1);
		assert_eq!(issues[0].path, "package.dimensionUnit");
	}

	#[test]
	fn collects_every_constraint_violation() {
		let mut input = valid_input();

		input["origin"]["addressLines"] = json!([]);
		input["origin"]["city"] = json!("x".repeat(31));
		input["destination"]["countryCode"] = json!("USA");
		input["package"]["weight"] = json!(0);
		input["serviceLevel"] = json!({ "code": "12345678901" });

		let issues = try_validate(&input).expect_err("Invalid fields must be rejected.");
		let paths = issues.iter().map(|issue| issue.path.as_str()).collect::<Vec<_>>();

		assert_eq!(
			paths,
			[
				"origin.addressLines",
				"origin.city",
				"destination.countryCode",
				"package.weight",
				"serviceLevel.code",
			]
		);
	}

	#[test]
	fn whitespace_only_text_counts_as_empty() {
		let mut input = valid_input();

		input["origin"]["city"] = json!("   ");
		input["destination"]["addressLines"] = json!(["1 Infinite Loop", " \t "]);
		input["serviceLevel"] = json!({ "code": "  " });

		let issues = try_validate(&input).expect_err("Blank text must be rejected.");
		let paths = issues.iter().map(|issue| issue.path.as_str()).collect::<Vec<_>>();

		assert_eq!(paths, ["origin.city", "destination.addressLines[1]", "serviceLevel.code"]);
		assert!(issues.iter().all(|issue| issue.message == "must not be empty"));
	}

	#[test]
	fn validate_joins_messages_into_one_error() {
		let mut input = valid_input();

		input["origin"]["postalCode"] = json!("");
		input["package"]["height"] = json!(-1);

		let err = validate(&input).expect_err("Invalid input must fail.");

		assert_eq!(err.kind, ErrorKind::ValidationError);
		assert!(err.message.contains("origin.postalCode: must not be empty"));
		assert!(err.message.contains("package.height: must be positive"));
	}

	#[test]
	fn non_object_input_is_reported_at_the_root() {
		let issues = try_validate(&json!("not a request")).expect_err("Strings must be rejected.");

		assert_eq!(issues[0].path, "input");
	}

	#[test]
	fn validation_does_not_mutate_input() {
		let input = valid_input();
		let before = input.clone();
		let _ = validate(&input);
		let _ = validate(&input);

		assert_eq!(input, before);
	}
}
