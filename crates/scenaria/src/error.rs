//! Error types for Scenaria operations.
//!
//! This module provides the main error type [`ScenariaError`] which wraps
//! the error conditions that can occur while compiling and exporting a model.

use std::io;

use thiserror::Error;

use scenaria_parser::error::ParseError;

/// The main error type for Scenaria operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// callers can render them against the original spans.
#[derive(Debug, Error)]
pub enum ScenariaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for ScenariaError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ScenariaError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
