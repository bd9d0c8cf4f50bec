//! Common error types for the dashboard client.
//!
//! This module provides shared error types that are used across multiple crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors raised while decoding dashboard domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A chart record did not carry a usable label or count.
    #[error("invalid chart record: {0}")]
    InvalidChartRecord(String),
}
