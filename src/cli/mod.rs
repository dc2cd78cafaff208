//! Command-line interface for routebench.
//!
//! Provides the batch and extended run commands plus CSV output handling.

mod commands;

pub use commands::{parse_cli, run_with_cli, BatchArgs, Cli, Commands, ExtendedArgs};
