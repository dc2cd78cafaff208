//! Error types for routebench operations.
//!
//! Defines error types for the two failure surfaces of the harness:
//! - Remote solver requests (sample + solve endpoints)
//! - Dataset export (CSV serialization and parsing)
//!
//! Degenerate results (a successful solve reporting zero distance) are not
//! errors; they are handled by the trial retry loop in `harness::trial`.

use thiserror::Error;

/// Errors that can occur while talking to the remote solver service.
///
/// Every variant aborts the current trial attempt immediately and is never
/// retried: only degenerate results (which are not errors) trigger retries.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse solver response: {0}")]
    ParseError(String),

    #[error("Solver API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Solver rejected the request: {0}")]
    Rejected(String),

    #[error("Solver returned {got} points, requested {requested}")]
    PartialSample { requested: usize, got: usize },
}

/// Errors that can occur during dataset export and re-import.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV header mismatch: expected '{expected}', found '{found}'")]
    HeaderMismatch { expected: String, found: String },

    #[error("Invalid CSV row at line {line}: {message}")]
    InvalidRow { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
