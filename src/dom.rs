//! In-memory DOM
//!
//! This module provides access to tablebind-dom: element and text nodes,
//! markup parsing and serialization, and disposal callbacks that run when a
//! node leaves the tree.

// Re-export all tablebind-dom functionality
pub use tablebind_dom::*;
