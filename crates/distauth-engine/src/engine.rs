//! # Authorization Engine
//!
//! Decides whether a distributor may operate in a region.
//!
//! ## Decision Procedure
//!
//! The first step that reaches a decision ends evaluation:
//!
//! 1. Normalize the region.
//! 2. Unknown region (not a catalog key or suffix of one) → deny.
//! 3. Parent present → evaluate the parent first; parent denied → deny,
//!    naming the parent. The parent's own reason is not propagated.
//! 4. First matching exclude pattern → deny.
//! 5. First matching include pattern → allow.
//! 6. Otherwise → deny, no matching inclusion.
//!
//! ## Delegation Ceiling
//!
//! Because step 3 runs before the distributor's own rules, a child is never
//! allowed where its parent is denied, whatever the child's include list
//! says. Parent authorization is necessary but not sufficient: the child
//! must still match one of its own include patterns.
//!
//! The engine only borrows the catalog and registry. It performs no mutation
//! and has no error path; every outcome is a [`Decision`].

use serde::Serialize;

use distauth_core::{DistributorName, RegionKey, RegionPattern};

use crate::catalog::RegionCatalog;
use crate::registry::{Distributor, DistributorRegistry};

// ─── Decision ───────────────────────────────────────────────────────

/// Outcome of one authorization query, with the reason for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// The region is neither a catalog key nor a suffix of one.
    RegionNotFound,
    /// The parent distributor is not authorized for the region.
    DeniedByParent {
        /// The immediate parent whose evaluation denied.
        parent: DistributorName,
    },
    /// One of the distributor's own exclude patterns matched.
    Excluded {
        /// The distributor whose rule matched.
        distributor: DistributorName,
        /// The first matching exclude pattern.
        pattern: RegionPattern,
    },
    /// One of the distributor's own include patterns matched.
    Included {
        /// The distributor whose rule matched.
        distributor: DistributorName,
        /// The first matching include pattern.
        pattern: RegionPattern,
    },
    /// No include pattern matched.
    NoMatchingInclusion,
}

impl Decision {
    /// Whether the query is authorized.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Included { .. })
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegionNotFound => f.write_str("Region does not exist"),
            Self::DeniedByParent { parent } => {
                write!(f, "Denied by parent distributor: {parent}")
            }
            Self::Excluded {
                distributor,
                pattern,
            } => write!(
                f,
                "Explicitly excluded by distributor: {distributor} (rule {pattern})"
            ),
            Self::Included {
                distributor,
                pattern,
            } => write!(
                f,
                "Explicitly included by distributor: {distributor} (rule {pattern})"
            ),
            Self::NoMatchingInclusion => f.write_str("No matching inclusion found"),
        }
    }
}

// ─── Engine ─────────────────────────────────────────────────────────

/// Read-only view over a catalog and a registry that answers queries.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationEngine<'a> {
    catalog: &'a RegionCatalog,
    registry: &'a DistributorRegistry,
}

impl<'a> AuthorizationEngine<'a> {
    /// Borrow a built catalog and registry.
    pub fn new(catalog: &'a RegionCatalog, registry: &'a DistributorRegistry) -> Self {
        Self { catalog, registry }
    }

    /// Decide whether `distributor` may operate in `region` (raw text).
    pub fn authorize(&self, distributor: &Distributor, region: &str) -> Decision {
        self.authorize_key(distributor, &RegionKey::new(region))
    }

    /// Decide for an already-normalized region.
    pub fn authorize_key(&self, distributor: &Distributor, region: &RegionKey) -> Decision {
        if !self.catalog.exists(region) {
            tracing::debug!(%region, "region not in catalog");
            return Decision::RegionNotFound;
        }

        let decision = self.evaluate(distributor, region);
        tracing::debug!(
            distributor = %distributor.name(),
            %region,
            allowed = decision.is_allowed(),
            reason = %decision,
            "authorization decided"
        );
        decision
    }

    /// Steps 3–6 for one node. Recursion depth is bounded by the hierarchy
    /// depth; the registry rejects cycles at build time.
    fn evaluate(&self, distributor: &Distributor, region: &RegionKey) -> Decision {
        if let Some(parent) = self.registry.parent_of(distributor) {
            if !self.evaluate(parent, region).is_allowed() {
                return Decision::DeniedByParent {
                    parent: parent.name().clone(),
                };
            }
        }

        if let Some(pattern) = first_match(distributor.exclude(), region) {
            return Decision::Excluded {
                distributor: distributor.name().clone(),
                pattern: pattern.clone(),
            };
        }

        if let Some(pattern) = first_match(distributor.include(), region) {
            return Decision::Included {
                distributor: distributor.name().clone(),
                pattern: pattern.clone(),
            };
        }

        Decision::NoMatchingInclusion
    }
}

fn first_match<'p>(patterns: &'p [RegionPattern], region: &RegionKey) -> Option<&'p RegionPattern> {
    patterns.iter().find(|pattern| pattern.matches(region))
}
