//! Fine-grained reactive values
//!
//! This module provides access to tablebind-reactive: signals with tracked
//! (`get`) and untracked (`peek`) reads, effects that rerun when a tracked
//! signal changes, and owned change subscriptions.

// Re-export all tablebind-reactive functionality
pub use tablebind_reactive::*;
