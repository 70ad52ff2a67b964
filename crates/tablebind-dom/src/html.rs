//! Serialization helpers and character references.

use std::borrow::Cow;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Returns whether `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Escapes text content for serialization.
///
/// Returns a borrowed reference if no escaping is needed.
pub fn escape_text(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Escapes a double-quoted attribute value for serialization.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '"']) {
		Cow::Owned(s.replace('&', "&amp;").replace('"', "&quot;"))
	} else {
		Cow::Borrowed(s)
	}
}

/// Decodes character references (`&amp;`, `&#x27;`, `&#39;`, ...).
///
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
	if !s.contains('&') {
		return Cow::Borrowed(s);
	}

	let mut decoded = String::with_capacity(s.len());
	let mut rest = s;
	while let Some(amp) = rest.find('&') {
		decoded.push_str(&rest[..amp]);
		rest = &rest[amp..];

		let reference = rest[1..]
			.find(';')
			.filter(|&end| end <= 10)
			.and_then(|end| decode_reference(&rest[1..=end]).map(|c| (c, end + 2)));

		match reference {
			Some((c, consumed)) => {
				decoded.push(c);
				rest = &rest[consumed..];
			}
			None => {
				decoded.push('&');
				rest = &rest[1..];
			}
		}
	}
	decoded.push_str(rest);
	Cow::Owned(decoded)
}

fn decode_reference(name: &str) -> Option<char> {
	match name {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"quot" => Some('"'),
		"apos" => Some('\''),
		"nbsp" => Some('\u{a0}'),
		_ => {
			let number = name.strip_prefix('#')?;
			let code = match number.strip_prefix(['x', 'X']) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => number.parse().ok()?,
			};
			char::from_u32(code)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a &amp; b", "a & b")]
	#[case("&lt;td&gt;", "<td>")]
	#[case("&quot;q&quot; &#x27;s&#x27;", "\"q\" 's'")]
	#[case("&#x2F;path&#47;", "/path/")]
	#[case("&nbsp;", "\u{a0}")]
	#[case("fish & chips", "fish & chips")]
	#[case("&unknown;", "&unknown;")]
	#[case("&#xZZ;", "&#xZZ;")]
	#[case("trailing &", "trailing &")]
	fn test_decode_entities(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(decode_entities(input), expected);
	}

	#[rstest]
	fn test_escape_text_borrows_when_clean() {
		assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
		assert_eq!(escape_text("1 < 2 & 3"), "1 &lt; 2 &amp; 3");
	}

	#[rstest]
	fn test_escape_attr() {
		assert_eq!(escape_attr(r#"a "b" & c"#), "a &quot;b&quot; &amp; c");
	}
}
