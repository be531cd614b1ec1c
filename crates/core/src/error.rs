//! Error types for the chladni core.
//!
//! These surface only from constructors and I/O; the session-level solver
//! and particle APIs degrade to no-ops instead of returning errors so the
//! frame loop is never interrupted.

use thiserror::Error;

/// Errors produced by core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Width or height was zero (or overflowed) when creating a grid.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// An I/O failure while writing a snapshot.
    #[error("io error: {0}")]
    Io(String),
}
