//! The table binding
//!
//! This module provides access to tablebind-table.
//!
//! ## Architecture
//!
//! - **Shape Resolver**: turns options into row and column keys
//! - **Markup Builder**: renders header and body markup, escaping values
//! - **Reactive Wiring**: patches single cells when their signals change
//! - **Binding**: reruns the whole pipeline when a structural option changes

// Re-export all tablebind-table functionality
pub use tablebind_table::*;
