//! HTML escaping and the safe-string escape hatch.

use std::borrow::Cow;
use std::fmt;

use crate::value::Value;

/// A string that is embedded into table markup verbatim.
///
/// Use it to put pre-built markup into a cell or header. The contents are
/// trusted: nothing is escaped.
///
/// ```
/// use tablebind_table::{SafeString, Value, escape_value};
///
/// let link = Value::from(SafeString::new("<a href=\"/x\">x</a>"));
/// assert_eq!(escape_value(&link), "<a href=\"/x\">x</a>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SafeString(String);

impl SafeString {
	/// Marks `markup` as safe.
	pub fn new(markup: impl Into<String>) -> Self {
		Self(markup.into())
	}

	/// The raw markup.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Unwraps the raw markup.
	pub fn into_inner(self) -> String {
		self.0
	}
}

impl fmt::Display for SafeString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for SafeString {
	fn from(markup: &str) -> Self {
		Self::new(markup)
	}
}

impl From<String> for SafeString {
	fn from(markup: String) -> Self {
		Self(markup)
	}
}

/// Escapes a string for embedding in table markup.
///
/// This function replaces the following characters:
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
/// - `"` → `&quot;`
/// - `'` → `&#x27;`
/// - `/` → `&#x2F;`
///
/// Returns a borrowed reference if no escaping is needed.
pub fn escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'', '/']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				'/' => escaped.push_str("&#x2F;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Escapes the text form of `value`.
///
/// [`Value::Safe`] bypasses escaping and [`Value::Null`] renders as an empty
/// string. A [`Value::Signal`] renders its current value without tracking it.
pub fn escape_value(value: &Value) -> Cow<'_, str> {
	match value {
		Value::Null => Cow::Borrowed(""),
		Value::Safe(safe) => Cow::Borrowed(safe.as_str()),
		Value::Text(text) => escape(text),
		Value::Signal(signal) => Cow::Owned(signal.with_peek(|inner| escape_value(inner).into_owned())),
		other => Cow::Owned(escape(&other.to_string()).into_owned()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("plain", "plain")]
	#[case("a & b", "a &amp; b")]
	#[case("<td>", "&lt;td&gt;")]
	#[case(r#"say "hi""#, "say &quot;hi&quot;")]
	#[case("it's", "it&#x27;s")]
	#[case("</tbody>", "&lt;&#x2F;tbody&gt;")]
	#[case("&amp;", "&amp;amp;")]
	fn test_escape(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape(input), expected);
	}

	#[rstest]
	fn test_escape_borrows_clean_input() {
		assert!(matches!(escape("123"), Cow::Borrowed("123")));
	}

	#[rstest]
	#[case(Value::Null, "")]
	#[case(Value::from(42), "42")]
	#[case(Value::from(2.0), "2")]
	#[case(Value::from(true), "true")]
	#[case(Value::from("a/b"), "a&#x2F;b")]
	#[case(Value::from(SafeString::new("<b>x</b>")), "<b>x</b>")]
	#[case(Value::list([Value::from(1), Value::Null, Value::from("<")]), "1,,&lt;")]
	fn test_escape_value(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(escape_value(&value), expected);
	}

	proptest! {
		#[test]
		fn safe_strings_are_never_escaped(markup in "\\PC*") {
			let escaped = escape(&markup).into_owned();
			let value = Value::from(SafeString::new(escaped.clone()));
			prop_assert_eq!(escape_value(&value), escaped);
		}

		#[test]
		fn escaped_output_has_no_markup_characters(text in "\\PC*") {
			let escaped = escape(&text);
			prop_assert!(!escaped.contains(['<', '>', '"', '\'', '/']));
		}
	}
}
