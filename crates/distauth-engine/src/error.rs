//! # Error Types
//!
//! Build-time failures. Every error here is fatal to the load phase: no
//! partial catalog or registry is ever returned. The authorization engine
//! itself has no error type; all of its outcomes are [`crate::Decision`]s.

use std::path::PathBuf;

use thiserror::Error;

use distauth_core::{DistributorName, ValidationError};

/// Structural problems in the distributor hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A parent name that no distributor record defines.
    #[error("distributor {child} names unknown parent {parent}")]
    UnknownParent {
        /// The distributor carrying the dangling reference.
        child: DistributorName,
        /// The parent name that could not be resolved.
        parent: DistributorName,
    },

    /// In ordered linking mode, a child row appeared before its parent.
    #[error("distributor {child} references parent {parent} before it is defined")]
    ForwardParentReference {
        /// The distributor carrying the forward reference.
        child: DistributorName,
        /// The parent that had not been registered yet.
        parent: DistributorName,
    },

    /// The parent chain loops back on itself.
    #[error("parent cycle detected: {}", format_chain(.chain))]
    ParentCycle {
        /// The chain walked from the first node until the repeat, with the
        /// repeated node appended at the end.
        chain: Vec<DistributorName>,
    },
}

fn format_chain(chain: &[DistributorName]) -> String {
    chain
        .iter()
        .map(DistributorName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Failure to load city or distributor records.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input file could not be opened.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed CSV (including rows whose field count
    /// differs from the header).
    #[error("malformed {input} records: {source}")]
    Csv {
        /// Which input was being read ("city" or "distributor").
        input: &'static str,
        /// Underlying CSV error, carrying the position.
        #[source]
        source: csv::Error,
    },

    /// A row has too few fields for the columns this input reads.
    #[error("{input} record on line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        /// Which input was being read.
        input: &'static str,
        /// One-based line number of the row.
        line: u64,
        /// Minimum field count.
        expected: usize,
        /// Actual field count.
        found: usize,
    },

    /// A distributor name or pattern failed validation.
    #[error("{input} record on line {line}: {source}")]
    InvalidField {
        /// Which input was being read.
        input: &'static str,
        /// One-based line number of the row.
        line: u64,
        /// The validation failure.
        #[source]
        source: ValidationError,
    },

    /// The records parsed but do not form a valid hierarchy.
    #[error("invalid distributor hierarchy: {0}")]
    Registry(#[from] RegistryError),
}
