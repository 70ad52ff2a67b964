//! Markup fragment parser.
//!
//! Handles the HTML subset produced by renderers plus hand-written safe
//! markup: nested elements, quoted/unquoted/bare attributes, void and
//! self-closing elements, comments and character references. It is lenient
//! about structure (unclosed elements are closed at end of input, stray
//! closing tags are ignored) and strict about tag syntax.

use crate::error::DomError;
use crate::html::{decode_entities, is_void_element};
use crate::node::Node;

struct StartTag {
	name: String,
	attributes: Vec<(String, String)>,
	self_closing: bool,
}

/// Parse `markup` into a list of detached top-level nodes.
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, DomError> {
	let bytes = markup.as_bytes();
	let mut roots: Vec<Node> = Vec::new();
	let mut open: Vec<(String, Node)> = Vec::new();
	let mut pos = 0;

	let append = |roots: &mut Vec<Node>, open: &[(String, Node)], node: Node| match open.last() {
		Some((_, parent)) => parent.append_child(&node),
		None => roots.push(node),
	};

	while pos < bytes.len() {
		let rest = &markup[pos..];

		if rest.starts_with("<!--") {
			let end = rest[4..]
				.find("-->")
				.ok_or(DomError::UnterminatedComment { offset: pos })?;
			pos += 4 + end + 3;
		} else if rest.starts_with("</") {
			let end = rest.find('>').ok_or(DomError::UnterminatedTag { offset: pos })?;
			let name = rest[2..end].trim().to_ascii_lowercase();
			if name.is_empty() {
				return Err(DomError::InvalidTagName { offset: pos });
			}
			if let Some(index) = open.iter().rposition(|(tag, _)| *tag == name) {
				open.truncate(index);
			}
			pos += end + 1;
		} else if rest.len() > 1 && rest.starts_with('<') && bytes[pos + 1].is_ascii_alphabetic() {
			let (tag, next) = parse_start_tag(markup, pos)?;
			let element = Node::element(&tag.name);
			for (name, value) in tag.attributes {
				if element.attr(&name).is_none() {
					element.set_attr(name, value);
				}
			}
			append(&mut roots, &open, element.clone());
			if !tag.self_closing && !is_void_element(&tag.name) {
				open.push((tag.name, element));
			}
			pos = next;
		} else {
			// Text runs to the next '<'; a '<' that starts no tag is text too
			let first = rest.chars().next().map_or(1, char::len_utf8);
			let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
			let text = decode_entities(&rest[..end]);
			append(&mut roots, &open, Node::text(text.into_owned()));
			pos += end;
		}
	}

	if !open.is_empty() {
		tracing::trace!(unclosed = open.len(), "closing elements at end of markup");
	}

	Ok(roots)
}

fn parse_start_tag(markup: &str, start: usize) -> Result<(StartTag, usize), DomError> {
	let bytes = markup.as_bytes();
	let unterminated = DomError::UnterminatedTag { offset: start };
	let mut pos = start + 1;

	let name_end = scan(bytes, pos, |b| b.is_ascii_alphanumeric() || b == b'-' || b == b':');
	let name = markup[pos..name_end].to_ascii_lowercase();
	pos = name_end;

	let mut attributes = Vec::new();
	loop {
		pos = scan(bytes, pos, |b| b.is_ascii_whitespace());
		match bytes.get(pos) {
			None => return Err(unterminated),
			Some(b'>') => {
				return Ok((
					StartTag {
						name,
						attributes,
						self_closing: false,
					},
					pos + 1,
				));
			}
			Some(b'/') if bytes.get(pos + 1) == Some(&b'>') => {
				return Ok((
					StartTag {
						name,
						attributes,
						self_closing: true,
					},
					pos + 2,
				));
			}
			Some(_) => {}
		}

		let attr_end = scan(bytes, pos, |b| {
			!(b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/')
		});
		if attr_end == pos {
			// Stray '/' or '='
			pos += 1;
			continue;
		}
		let attr_name = markup[pos..attr_end].to_ascii_lowercase();
		pos = scan(bytes, attr_end, |b| b.is_ascii_whitespace());

		let value = if bytes.get(pos) == Some(&b'=') {
			pos = scan(bytes, pos + 1, |b| b.is_ascii_whitespace());
			match bytes.get(pos) {
				None => return Err(unterminated),
				Some(&quote @ (b'"' | b'\'')) => {
					let close = markup[pos + 1..]
						.find(quote as char)
						.ok_or_else(|| unterminated.clone())?;
					let raw = &markup[pos + 1..pos + 1 + close];
					pos += close + 2;
					decode_entities(raw).into_owned()
				}
				Some(_) => {
					let value_end = scan(bytes, pos, |b| !(b.is_ascii_whitespace() || b == b'>'));
					let raw = &markup[pos..value_end];
					pos = value_end;
					decode_entities(raw).into_owned()
				}
			}
		} else {
			String::new()
		};

		attributes.push((attr_name, value));
	}
}

fn scan(bytes: &[u8], mut pos: usize, accept: impl Fn(u8) -> bool) -> usize {
	while pos < bytes.len() && accept(bytes[pos]) {
		pos += 1;
	}
	pos
}
