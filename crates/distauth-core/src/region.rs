//! # Regions, Patterns and the Matching Rule
//!
//! A region is addressed as `CITY-STATE-COUNTRY`. Broader scopes are the
//! trailing dash-delimited suffixes of that key: `STATE-COUNTRY` and
//! `COUNTRY`. Distributor rules are written as [`RegionPattern`]s at any of
//! those three granularities.
//!
//! ## Matching
//!
//! A pattern matches a region when the pattern's fields equal the region's
//! trailing fields, compared right to left (country first, then state, then
//! city). A pattern with more fields than the region never matches.
//!
//! ```text
//! region   PARIS - ILEDEFRANCE - FRANCE
//! pattern                        FRANCE   ✓
//! pattern          ILEDEFRANCE - FRANCE   ✓
//! pattern  LYON  - ILEDEFRANCE - FRANCE   ✗ (city differs)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{impl_normalizing_deserialize, normalize};

/// Separator between the fields of a region key or pattern.
pub const REGION_SEPARATOR: char = '-';

// ─── Region Key ─────────────────────────────────────────────────────

/// A normalized region identifier, full (`CITY-STATE-COUNTRY`) or partial.
///
/// Construction never fails: queries for regions that do not exist are
/// answered with a deny by the engine, not rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionKey(String);

impl RegionKey {
    /// Normalize a raw region string.
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// Build the full key from its three fields, normalizing each one.
    pub fn from_parts(city: &str, state: &str, country: &str) -> Self {
        Self(format!(
            "{}{REGION_SEPARATOR}{}{REGION_SEPARATOR}{}",
            normalize(city),
            normalize(state),
            normalize(country)
        ))
    }

    /// The normalized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fields of the key, left to right.
    pub fn fields(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.split(REGION_SEPARATOR)
    }

    /// The key itself followed by each of its non-empty trailing
    /// dash-delimited suffixes, from most to least specific.
    ///
    /// `PARIS-ILEDEFRANCE-FRANCE` yields `PARIS-ILEDEFRANCE-FRANCE`,
    /// `ILEDEFRANCE-FRANCE`, `FRANCE`.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        let key = self.0.as_str();
        std::iter::once(key)
            .chain(
                key.match_indices(REGION_SEPARATOR)
                    .map(move |(at, _)| &key[at + REGION_SEPARATOR.len_utf8()..]),
            )
            .filter(|scope| !scope.is_empty())
    }
}

impl<'de> Deserialize<'de> for RegionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for RegionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─── Region Pattern ─────────────────────────────────────────────────

/// A normalized include/exclude rule: `COUNTRY`, `STATE-COUNTRY` or a full
/// `CITY-STATE-COUNTRY` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegionPattern(String);

impl RegionPattern {
    /// Normalize and validate a raw pattern.
    ///
    /// Rejects patterns that are empty or contain an empty field
    /// (`FRANCE-`, `-FRANCE`, `A--B`); such a field could never be matched
    /// by a loaded region and almost always indicates a data-entry slip.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let pattern = normalize(raw);
        if pattern.is_empty() {
            return Err(ValidationError::EmptyPattern);
        }
        if let Some(position) = pattern
            .split(REGION_SEPARATOR)
            .position(|field| field.is_empty())
        {
            return Err(ValidationError::EmptySegment { pattern, position });
        }
        Ok(Self(pattern))
    }

    /// The normalized pattern.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of dash-delimited fields (1 = country, 2 = state, 3 = city).
    pub fn depth(&self) -> usize {
        self.0.split(REGION_SEPARATOR).count()
    }

    /// Whether this pattern covers `region`.
    pub fn matches(&self, region: &RegionKey) -> bool {
        matches(region.as_str(), self.as_str())
    }
}

impl_normalizing_deserialize!(RegionPattern);

impl std::fmt::Display for RegionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RegionPattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Right-aligned field comparison of two already-normalized strings.
///
/// True iff `pattern` has no more fields than `region` and every field of
/// `pattern` equals the field of `region` at the same distance from the end.
pub fn matches(region: &str, pattern: &str) -> bool {
    let region_fields: Vec<&str> = region.split(REGION_SEPARATOR).collect();
    let pattern_fields: Vec<&str> = pattern.split(REGION_SEPARATOR).collect();

    if pattern_fields.len() > region_fields.len() {
        return false;
    }

    region_fields
        .iter()
        .rev()
        .zip(pattern_fields.iter().rev())
        .all(|(r, p)| r == p)
}

// ─── City ───────────────────────────────────────────────────────────

/// One Region Catalog entry: a normalized (city, state, country) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    /// Normalized city name.
    pub city: String,
    /// Normalized state or province name.
    pub state: String,
    /// Normalized country name.
    pub country: String,
}

impl City {
    /// Normalize each field of a raw triple.
    pub fn new(city: &str, state: &str, country: &str) -> Self {
        Self {
            city: normalize(city),
            state: normalize(state),
            country: normalize(country),
        }
    }

    /// The full `CITY-STATE-COUNTRY` catalog key.
    pub fn key(&self) -> RegionKey {
        RegionKey::from_parts(&self.city, &self.state, &self.country)
    }
}
