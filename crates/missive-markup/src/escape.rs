//! Text escaping and number formatting shared by text and attribute output.

use std::borrow::Cow;

/// Escapes the five HTML-significant characters in a single pass.
///
/// Each of `& < > " '` is replaced by its entity exactly once; other
/// characters pass through untouched. Input that contains none of them is
/// returned borrowed.
///
/// # Examples
///
/// ```
/// use missive_markup::escape_html;
///
/// assert_eq!(escape_html("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
/// assert_eq!(escape_html("it's <b>"), "it&#39;s &lt;b&gt;");
/// ```
pub fn escape_html(input: &str) -> Cow<'_, str> {
	if !input.contains(['&', '<', '>', '"', '\'']) {
		return Cow::Borrowed(input);
	}

	let mut escaped = String::with_capacity(input.len() + 16);
	for c in input.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

/// Formats a number leaf as its canonical decimal string.
///
/// Integral values print without a fractional part and negative zero prints
/// as `0`. Non-finite values use the `NaN` / `Infinity` spellings.
pub fn format_number(value: f64) -> String {
	if value.is_nan() {
		"NaN".to_string()
	} else if value.is_infinite() {
		let spelled = if value > 0.0 { "Infinity" } else { "-Infinity" };
		spelled.to_string()
	} else if value == 0.0 {
		"0".to_string()
	} else {
		value.to_string()
	}
}

pub(crate) fn format_json_number(number: &serde_json::Number) -> String {
	if let Some(n) = number.as_i64() {
		n.to_string()
	} else if let Some(n) = number.as_u64() {
		n.to_string()
	} else {
		format_number(number.as_f64().unwrap_or(f64::NAN))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	/// Test: Escape html
	#[rstest]
	#[case("plain text", "plain text")]
	#[case("&", "&amp;")]
	#[case("<script>", "&lt;script&gt;")]
	#[case("\"quoted\"", "&quot;quoted&quot;")]
	#[case("it's", "it&#39;s")]
	#[case("&amp;", "&amp;amp;")]
	fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
		// Act
		let escaped = escape_html(input);

		// Assert
		assert_eq!(escaped, expected);
	}

	/// Test: Escape html borrows clean input
	#[rstest]
	fn test_escape_html_borrows_clean_input() {
		// Act
		let escaped = escape_html("nothing to see");

		// Assert
		assert!(matches!(escaped, Cow::Borrowed(_)));
	}

	/// Test: Format number
	#[rstest]
	#[case(16.0, "16")]
	#[case(-3.0, "-3")]
	#[case(1.5, "1.5")]
	#[case(-0.0, "0")]
	#[case(f64::NAN, "NaN")]
	#[case(f64::INFINITY, "Infinity")]
	#[case(f64::NEG_INFINITY, "-Infinity")]
	fn test_format_number(#[case] value: f64, #[case] expected: &str) {
		// Act / Assert
		assert_eq!(format_number(value), expected);
	}

	/// Test: Format json number
	#[rstest]
	fn test_format_json_number() {
		// Arrange
		let int = serde_json::Number::from(42);
		let float = serde_json::Number::from_f64(2.25).unwrap();

		// Act / Assert
		assert_eq!(format_json_number(&int), "42");
		assert_eq!(format_json_number(&float), "2.25");
	}
}
