//! Reactive table binding
//!
//! Renders a data source as an HTML table inside an element and keeps it
//! up to date. Structural changes (rows, columns, headers, classes) rebuild
//! the table; a change of a single reactive cell value patches only that
//! cell.
//!
//! # Features
//!
//! - **Shape inference**: rows and columns come from explicit keys or
//!   counts, or are inferred from a header array or from array data
//! - **Flexible cell values**: direct `data[row][column]` lookup, a
//!   property named by a column descriptor, or a function
//! - **Headers**: a header row from an array, a function or a descriptor
//!   property, and optional per-row header cells
//! - **Styling**: a class for every second row and per-cell classes
//! - **Safe output**: every value is HTML-escaped unless wrapped in a
//!   [`SafeString`]
//! - **Declarative options**: options can be read from JSON
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[TableOptions] -->|snapshot, tracked| B[resolve_shape]
//!     B --> C[Grid]
//!     C --> D[build_markup]
//!     D --> E[Markup html]
//!     D --> F[Reactive cells]
//!     E -->|replace children| G[Element]
//!     F -->|wire_cells| H[SubscriptionSet]
//!     H -->|disposed with| I[tbody]
//! ```
//!
//! # Example
//!
//! ```
//! use tablebind_dom::Node;
//! use tablebind_reactive::Signal;
//! use tablebind_table::{AxisSpec, TableBinding, TableOptions, Value};
//!
//! let rows = Signal::new(Value::list([Value::list([1, 2, 3]), Value::list([4, 5, 6])]));
//! let columns = Signal::new(3usize);
//! let element = Node::element("table");
//!
//! let _binding = TableBinding::bind(
//! 	&element,
//! 	TableOptions::new().data(rows.clone()).columns(columns.clone()),
//! )
//! .unwrap();
//! assert_eq!(element.text_content(), "123456");
//!
//! columns.set(2);
//! assert_eq!(element.text_content(), "1245");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod binding;
pub mod error;
pub mod markup;
pub mod options;
pub mod safe;
pub mod shape;
pub mod value;
pub mod wiring;

// Re-exports for convenience
pub use binding::TableBinding;
pub use error::{ConfigurationError, Result, TableError};
pub use markup::{Markup, ReactiveCell, build_markup, render_to_string};
pub use options::{AxisSpec, ColumnSpec, DataItem, Header, OptionsSnapshot, Prop, RowSpec, TableOptions};
pub use safe::{SafeString, escape, escape_value};
pub use shape::{Grid, resolve_shape};
pub use value::{Key, Record, Value};
pub use wiring::wire_cells;
