//! Minimal in-memory DOM for tablebind
//!
//! Provides just enough of a document model for a binding to render into and
//! patch: element and text nodes, attributes, markup parsing and
//! serialization, table accessors, and per-node disposal callbacks.
//!
//! ## Disposal
//!
//! Work registered with [`Node::add_dispose_callback`] runs exactly once, when
//! the node (or any ancestor) is removed from its parent, replaced through
//! [`Node::set_inner_html`] / [`Node::replace_children`] /
//! [`Node::clear_children`] / [`Node::set_text_content`], or explicitly
//! cleaned with [`Node::clean`]. Moving a node with [`Node::append_child`] is
//! not a removal.
//!
//! ## Example
//!
//! ```
//! use tablebind_dom::Node;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let table = Node::element("table");
//! table.set_inner_html("<tbody><tr><td>1 &amp; 2</td></tr></tbody>").unwrap();
//!
//! let tbody = table.t_body().unwrap();
//! let disposed = Rc::new(Cell::new(false));
//! tbody.add_dispose_callback({
//! 	let disposed = disposed.clone();
//! 	move || disposed.set(true)
//! });
//!
//! assert_eq!(table.text_content(), "1 & 2");
//! table.clear_children();
//! assert!(disposed.get());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod html;
pub mod node;
pub mod parser;

pub use error::DomError;
pub use node::{Node, NodeKind, WeakNode};
pub use parser::parse_fragment;
