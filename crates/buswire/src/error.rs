//! Error types for Buswire operations.
//!
//! This module provides the main error type [`BuswireError`] which wraps
//! the error conditions that can occur while loading and running a script.
//! Engine commands themselves never fail.

use std::io;

use thiserror::Error;

use buswire_script::{ParseError, error::Diagnostic};

/// The main error type for Buswire operations.
///
/// # Diagnostic Variants
///
/// The `Parse` and `Script` variants carry the script source next to the
/// diagnostics so callers can render labeled snippets.
#[derive(Debug, Error)]
pub enum BuswireError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Script { err: Diagnostic, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BuswireError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Script` error with the associated source code.
    pub fn new_script_error(err: Diagnostic, src: impl Into<String>) -> Self {
        Self::Script {
            err,
            src: src.into(),
        }
    }
}
