//! Error types for the spec DSL.
//!
//! Assertion failures are never errors: they are recorded in the
//! [`FailureLog`](crate::failures::FailureLog) and the run continues. The
//! variants here cover misuse of the DSL, report output and configuration.

use std::io;
use thiserror::Error;

/// Errors that can occur while driving a spec run.
#[derive(Debug, Error)]
pub enum BddError {
    /// A hook was attached while no `describe` block was open.
    #[error("before_each called outside of a describe block")]
    NoEnclosingBlock,

    /// Writing the report to its sink failed.
    #[error("failed to write spec report: {0}")]
    Io(#[from] io::Error),

    /// Error loading a run configuration file.
    #[error("failed to load config: {path}: {message}")]
    Config { path: String, message: String },
}

/// Result type for spec DSL operations.
pub type BddResult<T> = Result<T, BddError>;
