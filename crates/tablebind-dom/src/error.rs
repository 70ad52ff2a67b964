//! DOM error types.

use thiserror::Error;

/// Errors raised while turning markup into nodes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// A `<` opened a tag that never reached its `>`.
	#[error("unterminated tag starting at byte {offset}")]
	UnterminatedTag {
		/// Byte offset of the opening `<`.
		offset: usize,
	},
	/// A `<!--` without a matching `-->`.
	#[error("unterminated comment starting at byte {offset}")]
	UnterminatedComment {
		/// Byte offset of the opening `<!--`.
		offset: usize,
	},
	/// A closing tag without a name, such as `</>`.
	#[error("invalid tag name at byte {offset}")]
	InvalidTagName {
		/// Byte offset of the tag.
		offset: usize,
	},
}
