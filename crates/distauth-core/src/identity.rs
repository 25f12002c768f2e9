//! # Normalization and Distributor Identity
//!
//! Every string that takes part in an authorization decision goes through
//! [`normalize`] exactly once, at the boundary where it becomes a typed
//! value. Downstream code compares typed values only, so a raw, mixed-case
//! or padded string can never reach the catalog, the registry or the
//! matching rule.
//!
//! ## Normalization
//!
//! `normalize` strips every whitespace character (not just the ends) and
//! uppercases the rest:
//!
//! ```
//! use distauth_core::normalize;
//!
//! assert_eq!(normalize(" Ile de France "), "ILEDEFRANCE");
//! assert_eq!(normalize(&normalize("paris")), normalize("PARIS"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Normalize a raw identifier: drop all whitespace, then uppercase.
///
/// Idempotent, and insensitive to case and whitespace placement.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Implement `Deserialize` for string newtypes by routing the raw string
/// through the type's `new()` constructor, so a deserialized value is
/// normalized (and validated) exactly like a constructed one.
macro_rules! impl_normalizing_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_normalizing_deserialize;

/// Normalized, non-empty distributor name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DistributorName(String);

impl DistributorName {
    /// Normalize and validate a raw distributor name.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = normalize(raw);
        if name.is_empty() {
            return Err(ValidationError::EmptyDistributorName);
        }
        Ok(Self(name))
    }

    /// The normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_normalizing_deserialize!(DistributorName);

impl std::fmt::Display for DistributorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DistributorName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DistributorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
