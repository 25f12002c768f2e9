//! # distauth-core — Foundational Types for Territory Authorization
//!
//! Defines the primitives every other crate in the workspace builds on:
//! string normalization, the validated newtypes that carry normalized
//! values, and the right-aligned matching rule between a region and a
//! distributor's include/exclude pattern.
//!
//! ## Key Design Principles
//!
//! 1. **Normalize once, at the boundary.** `RegionKey`, `RegionPattern`
//!    and `DistributorName` can only be built through constructors that
//!    call [`normalize`]. No bare strings reach comparison or lookup.
//!
//! 2. **Queries never fail, configuration does.** `RegionKey::new` is
//!    infallible because an unknown region is a deny outcome. Names and
//!    patterns coming from distributor records are validated and rejected
//!    with a [`ValidationError`].
//!
//! 3. **Field-aligned matching.** Regions and patterns are compared field
//!    by field from the right, never as raw string suffixes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `distauth-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod region;

// Re-export primary types for ergonomic imports.
pub use error::ValidationError;
pub use identity::{normalize, DistributorName};
pub use region::{matches, City, RegionKey, RegionPattern, REGION_SEPARATOR};
