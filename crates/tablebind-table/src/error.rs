//! Error types for tablebind-table

use tablebind_dom::DomError;
use thiserror::Error;

/// The configuration cannot be resolved into a rows × columns grid.
///
/// Raised before any DOM mutation happens.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Neither `data` nor a `dataItem` function was supplied
	#[error("table binding requires a \"data\" source or a \"dataItem\" function")]
	MissingDataSource,

	/// Rows are neither given nor inferable from an array `data`
	#[error("table binding requires \"rows\" option")]
	MissingRows,

	/// Columns are neither given nor inferable from `header` or `data`
	#[error("table binding requires column information (either \"columns\" or \"header\")")]
	MissingColumns,

	/// `rowheader` was supplied but is not an array
	#[error("table binding \"rowheader\" option must be an array")]
	RowHeaderNotArray,
}

/// Error type for table rendering and binding
#[derive(Debug, Error)]
pub enum TableError {
	/// Invalid binding configuration
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// Rendered markup could not be turned into nodes
	#[error("Failed to build table nodes: {0}")]
	Dom(#[from] DomError),

	/// Declarative options were not valid JSON for a table binding
	#[error("Invalid table options: {0}")]
	InvalidOptions(#[from] serde_json::Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
