//! Typed errors surfaced to callers
//!
//! Storage and export failures use `anyhow`; these are the failures a caller
//! is expected to match on.

use std::path::PathBuf;
use thiserror::Error;

/// A user-initiated import that could not produce a configuration
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read theme file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("theme file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] UsageError),
}

/// Theme state accessed outside a live session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("theme session has ended; handles must not outlive their session")]
    SessionEnded,

    #[error("theme session is already borrowed; re-entrant access is not allowed")]
    Busy,
}

/// Rejected admin gate login
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("enter password")]
    Empty,

    #[error("wrong password")]
    Wrong,
}
