//! Attribute and inline style serialization.

use crate::escape::{escape_html, format_json_number};
use crate::node::Attributes;
use serde_json::{Map, Value};

/// Keys that carry layout or identity metadata and never reach the output.
const RESERVED_KEYS: &[&str] = &["children", "key", "ref"];

/// Attributes emitted bare (no value) when set to `true`.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
	"disabled",
	"checked",
	"readonly",
	"required",
	"hidden",
	"selected",
	"multiple",
	"autofocus",
	"autoplay",
	"controls",
	"loop",
	"muted",
	"open",
	"defer",
	"async",
];

pub fn is_boolean_attribute(name: &str) -> bool {
	BOOLEAN_ATTRIBUTES.contains(&name)
}

/// Serializes an attribute mapping in insertion order.
///
/// Returns a leading space followed by space-separated attributes, or the
/// empty string when nothing survives filtering.
///
/// # Examples
///
/// ```
/// use missive_markup::{Element, serialize_attrs};
/// use serde_json::json;
///
/// let input = Element::new("input").with_attrs(json!({
/// 	"type": "checkbox",
/// 	"checked": true,
/// 	"disabled": false,
/// 	"className": "toggle",
/// }));
/// assert_eq!(
/// 	serialize_attrs(input.attributes()),
/// 	r#" type="checkbox" checked class="toggle""#
/// );
/// ```
pub fn serialize_attrs(attrs: &Attributes) -> String {
	let mut output = String::new();
	for (key, value) in attrs {
		if let Some(attr) = serialize_attr(key, value) {
			output.push(' ');
			output.push_str(&attr);
		}
	}
	output
}

fn serialize_attr(key: &str, value: &Value) -> Option<String> {
	if RESERVED_KEYS.contains(&key) {
		return None;
	}

	let name = if key == "className" { "class" } else { key };

	match value {
		Value::Null | Value::Bool(false) => None,
		Value::Bool(true) if is_boolean_attribute(name) => Some(name.to_string()),
		Value::Bool(true) => Some(format!("{}=\"true\"", name)),
		Value::String(s) => Some(format!("{}=\"{}\"", name, escape_html(s))),
		Value::Number(n) => Some(format!("{}=\"{}\"", name, format_json_number(n))),
		Value::Object(style) if key == "style" => Some(format!(
			"style=\"{}\"",
			escape_html(&style_declarations(style))
		)),
		// Arrays and non-style objects have no attribute form
		Value::Object(_) | Value::Array(_) => None,
	}
}

/// Flattens a style object into a CSS declaration list.
///
/// Property names are converted from camelCase to kebab-case and entries
/// are joined with `; `. Null, array and object values are skipped.
///
/// ```
/// use missive_markup::style_declarations;
/// use serde_json::json;
///
/// let style = json!({ "backgroundColor": "red", "fontSize": "16px" });
/// assert_eq!(
/// 	style_declarations(style.as_object().unwrap()),
/// 	"background-color: red; font-size: 16px"
/// );
/// ```
pub fn style_declarations(style: &Map<String, Value>) -> String {
	style
		.iter()
		.filter_map(|(property, value)| {
			let value = match value {
				Value::String(s) => s.clone(),
				Value::Number(n) => format_json_number(n),
				Value::Bool(b) => b.to_string(),
				Value::Null | Value::Array(_) | Value::Object(_) => return None,
			};
			Some(format!("{}: {}", to_kebab_case(property), value))
		})
		.collect::<Vec<_>>()
		.join("; ")
}

/// Inserts `-` before every uppercase letter and lowercases it.
pub fn to_kebab_case(property: &str) -> String {
	let mut kebab = String::with_capacity(property.len() + 4);
	for c in property.chars() {
		if c.is_uppercase() {
			kebab.push('-');
			kebab.extend(c.to_lowercase());
		} else {
			kebab.push(c);
		}
	}
	kebab
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn attrs(value: Value) -> Attributes {
		match value {
			Value::Object(map) => map,
			_ => panic!("test attributes must be a JSON object"),
		}
	}

	/// Test: Empty mapping serializes to empty string
	#[rstest]
	fn test_empty_mapping_serializes_to_empty_string() {
		// Act / Assert
		assert_eq!(serialize_attrs(&Attributes::new()), "");
	}

	/// Test: Reserved keys are excluded
	#[rstest]
	fn test_reserved_keys_are_excluded() {
		// Arrange
		let mapping = attrs(json!({ "key": "k1", "ref": "r", "children": "c", "id": "x" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" id="x""#);
	}

	/// Test: Null and false are omitted
	#[rstest]
	fn test_null_and_false_are_omitted() {
		// Arrange
		let mapping = attrs(json!({ "title": null, "hidden": false, "lang": "en" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" lang="en""#);
	}

	/// Test: Boolean attribute true is bare
	#[rstest]
	fn test_boolean_attribute_true_is_bare() {
		// Arrange
		let mapping = attrs(json!({ "type": "checkbox", "checked": true, "disabled": false }));

		// Act
		let serialized = serialize_attrs(&mapping);

		// Assert
		assert_eq!(serialized, r#" type="checkbox" checked"#);
	}

	/// Test: True on regular attribute is stringified
	#[rstest]
	fn test_true_on_regular_attribute_is_stringified() {
		// Arrange
		let mapping = attrs(json!({ "aria-hidden": true }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" aria-hidden="true""#);
	}

	/// Test: Class name is renamed
	#[rstest]
	fn test_class_name_is_renamed() {
		// Arrange
		let mapping = attrs(json!({ "className": "btn primary" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" class="btn primary""#);
	}

	/// Test: Values are escaped
	#[rstest]
	fn test_values_are_escaped() {
		// Arrange
		let mapping = attrs(json!({ "title": "\"quoted\" & <tagged>", "alt": "it's" }));

		// Act / Assert
		assert_eq!(
			serialize_attrs(&mapping),
			r#" title="&quot;quoted&quot; &amp; &lt;tagged&gt;" alt="it&#39;s""#
		);
	}

	/// Test: Numbers are emitted
	#[rstest]
	fn test_numbers_are_emitted() {
		// Arrange
		let mapping = attrs(json!({ "width": 600, "height": 1.5 }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" width="600" height="1.5""#);
	}

	/// Test: Style object is flattened
	#[rstest]
	fn test_style_object_is_flattened() {
		// Arrange
		let mapping = attrs(json!({ "style": { "backgroundColor": "red", "fontSize": "16px" } }));

		// Act / Assert
		assert_eq!(
			serialize_attrs(&mapping),
			r#" style="background-color: red; font-size: 16px""#
		);
	}

	/// Test: Style string passes through
	#[rstest]
	fn test_style_string_passes_through() {
		// Arrange
		let mapping = attrs(json!({ "style": "color: blue" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" style="color: blue""#);
	}

	/// Test: Style values are escaped
	#[rstest]
	fn test_style_values_are_escaped() {
		// Arrange
		let mapping = attrs(json!({ "style": { "fontFamily": "\"Helvetica Neue\", Arial" } }));

		// Act / Assert
		assert_eq!(
			serialize_attrs(&mapping),
			r#" style="font-family: &quot;Helvetica Neue&quot;, Arial""#
		);
	}

	/// Test: Other objects and arrays are dropped
	#[rstest]
	fn test_other_objects_and_arrays_are_dropped() {
		// Arrange
		let mapping = attrs(json!({ "data": { "a": 1 }, "items": [1, 2], "id": "kept" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" id="kept""#);
	}

	/// Test: Emission follows insertion order
	#[rstest]
	fn test_emission_follows_insertion_order() {
		// Arrange
		let mapping = attrs(json!({ "z": "1", "a": "2", "m": "3" }));

		// Act / Assert
		assert_eq!(serialize_attrs(&mapping), r#" z="1" a="2" m="3""#);
	}

	/// Test: To kebab case
	#[rstest]
	#[case("backgroundColor", "background-color")]
	#[case("fontSize", "font-size")]
	#[case("color", "color")]
	#[case("WebkitTextSizeAdjust", "-webkit-text-size-adjust")]
	fn test_to_kebab_case(#[case] input: &str, #[case] expected: &str) {
		// Act / Assert
		assert_eq!(to_kebab_case(input), expected);
	}

	/// Test: Style skips null values
	#[rstest]
	fn test_style_skips_null_values() {
		// Arrange
		let style = attrs(json!({ "color": "red", "margin": null, "padding": 0 }));

		// Act / Assert
		assert_eq!(style_declarations(&style), "color: red; padding: 0");
	}
}
