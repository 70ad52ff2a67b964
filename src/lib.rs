//! # tablebind
//!
//! A reactive HTML table binding. Give it a data source and a few options;
//! it renders a `<table>` into an element and keeps it current. Changes to
//! the table's structure rebuild it, changes to a single reactive cell value
//! patch only that cell.
//!
//! ## Crates
//!
//! - [`reactive`]: `Signal`, `Effect`, `Subscription` and the dependency
//!   tracking runtime
//! - [`dom`]: the in-memory DOM the table is rendered into
//! - [`table`]: options, shape resolution, markup building and the
//!   `TableBinding` itself
//!
//! ## Feature Flags
//!
//! - `table` (default) - everything
//! - `reactive` - reactive primitives only
//! - `dom` - in-memory DOM only
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "table")]
//! # {
//! use tablebind::dom::Node;
//! use tablebind::reactive::Signal;
//! use tablebind::table::{Header, TableBinding, TableOptions, Value};
//!
//! let price = Signal::new(Value::from(10));
//! let element = Node::element("table");
//! let _binding = TableBinding::bind(
//! 	&element,
//! 	TableOptions::new()
//! 		.data(Value::list([Value::list([Value::from("apple"), Value::from(price.clone())])]))
//! 		.header(Header::labels(["item", "price"])),
//! )
//! .unwrap();
//!
//! price.set(Value::from(12));
//! assert_eq!(
//! 	element.inner_html(),
//! 	"<thead><tr><th>item</th><th>price</th></tr></thead>\
//! 	 <tbody><tr><td>apple</td><td>12</td></tr></tbody>",
//! );
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "dom")]
pub mod dom;
#[cfg(feature = "reactive")]
pub mod reactive;
#[cfg(feature = "table")]
pub mod table;

/// Convenience re-exports for binding tables
#[cfg(feature = "table")]
pub mod prelude {
	pub use crate::dom::Node;
	pub use crate::reactive::{Effect, EffectTiming, Signal};
	pub use crate::table::{
		AxisSpec, DataItem, Header, Key, SafeString, TableBinding, TableError, TableOptions, Value,
	};
}
