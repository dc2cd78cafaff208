//! routebench: batch benchmark harness for a remote TSP routing service.
//!
//! This library drives the routing service's sample + solve endpoints in
//! strictly sequential trials, retries degenerate (zero-distance) results,
//! aggregates validated records into a dataset, and turns the dataset into
//! summary statistics, growth projections and CSV / chart-ready exports.

// Core modules
pub mod cli;
pub mod client;
pub mod error;
pub mod export;
pub mod harness;

// Re-export commonly used error types
pub use error::{ExportError, RequestError};
