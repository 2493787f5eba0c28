//! Analysis modules.
//!
//! Grouped statistics over the loaded passenger table.

pub mod aggregator;

pub use aggregator::*;
