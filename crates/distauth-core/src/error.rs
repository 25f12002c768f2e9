//! # Error Types
//!
//! Validation errors raised when raw input is turned into one of the
//! normalized newtypes in [`crate::identity`]. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! Region *queries* never fail validation: an unknown or garbled region is
//! an ordinary deny outcome in the engine. Only configuration data (names
//! and patterns read from distributor records) is validated here.

use thiserror::Error;

/// Rejection of a raw distributor name or region pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The distributor name is empty once whitespace is stripped.
    #[error("distributor name is empty")]
    EmptyDistributorName,

    /// The region pattern is empty once whitespace is stripped.
    #[error("region pattern is empty")]
    EmptyPattern,

    /// A dash-delimited segment of the pattern is empty.
    #[error("region pattern {pattern:?} has an empty segment at position {position}")]
    EmptySegment {
        /// The normalized pattern.
        pattern: String,
        /// Zero-based index of the empty segment, counted from the left.
        position: usize,
    },
}
