//! Dataset loading.
//!
//! This module fetches the passenger CSV and turns it into typed records.

pub mod error;
pub mod loader;
pub mod parser;

pub use loader::{Dataset, DatasetSource, FetchOptions, DEFAULT_SOURCE_URL};
