//! # Distributor Registry
//!
//! Owns every [`Distributor`] node. A node's parent is a relation, not
//! ownership: it is stored as an index into the registry's own arena and
//! resolved through [`DistributorRegistry::parent_of`].
//!
//! ## Building
//!
//! ```text
//! records ──▶ register (last write wins) ──▶ link parents ──▶ cycle check
//! ```
//!
//! Parent linking runs in one of two [`ParentLinking`] modes:
//!
//! - **TwoPass** (default): every record is registered before any parent is
//!   linked, so input order does not matter. A parent name that no record
//!   defines fails the build.
//! - **Ordered**: a parent must already be registered when its child row is
//!   read. A forward reference fails the build.
//!
//! After linking, every parent chain is walked once; a cycle fails the build.
//! A successfully built registry is therefore a forest, and recursive
//! authorization over it always terminates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use distauth_core::{DistributorName, RegionPattern};

use crate::error::RegistryError;

// ─── Linking Mode ───────────────────────────────────────────────────

/// How parent names in distributor records are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentLinking {
    /// Register all records, then link parents by name.
    #[default]
    TwoPass,
    /// Require each parent to precede its children in the input.
    Ordered,
}

impl std::fmt::Display for ParentLinking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoPass => f.write_str("two-pass"),
            Self::Ordered => f.write_str("ordered"),
        }
    }
}

// ─── Records ────────────────────────────────────────────────────────

/// One parsed distributor row, before parent linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributorRecord {
    /// Normalized distributor name.
    pub name: DistributorName,
    /// Patterns granting authorization, in input order.
    pub include: Vec<RegionPattern>,
    /// Patterns denying authorization, in input order.
    pub exclude: Vec<RegionPattern>,
    /// Name of the parent distributor, if any.
    pub parent: Option<DistributorName>,
}

impl DistributorRecord {
    /// A root record with no rules.
    pub fn new(name: DistributorName) -> Self {
        Self {
            name,
            include: Vec::new(),
            exclude: Vec::new(),
            parent: None,
        }
    }

    /// Append include patterns.
    pub fn including<I: IntoIterator<Item = RegionPattern>>(mut self, patterns: I) -> Self {
        self.include.extend(patterns);
        self
    }

    /// Append exclude patterns.
    pub fn excluding<I: IntoIterator<Item = RegionPattern>>(mut self, patterns: I) -> Self {
        self.exclude.extend(patterns);
        self
    }

    /// Set the parent.
    pub fn with_parent(mut self, parent: DistributorName) -> Self {
        self.parent = Some(parent);
        self
    }
}

// ─── Distributor ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(usize);

/// A registered distributor.
#[derive(Debug, Clone)]
pub struct Distributor {
    name: DistributorName,
    include: Vec<RegionPattern>,
    exclude: Vec<RegionPattern>,
    parent_name: Option<DistributorName>,
    parent: Option<NodeId>,
}

impl Distributor {
    /// Normalized name.
    pub fn name(&self) -> &DistributorName {
        &self.name
    }

    /// Include patterns, in input order.
    pub fn include(&self) -> &[RegionPattern] {
        &self.include
    }

    /// Exclude patterns, in input order.
    pub fn exclude(&self) -> &[RegionPattern] {
        &self.exclude
    }

    /// Name of the parent, if this distributor has one.
    pub fn parent_name(&self) -> Option<&DistributorName> {
        self.parent_name.as_ref()
    }

    /// Whether this distributor has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl From<DistributorRecord> for Distributor {
    fn from(record: DistributorRecord) -> Self {
        Self {
            name: record.name,
            include: record.include,
            exclude: record.exclude,
            parent_name: record.parent,
            parent: None,
        }
    }
}

// ─── Registry ───────────────────────────────────────────────────────

/// Immutable forest of distributors, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct DistributorRegistry {
    nodes: Vec<Distributor>,
    index: HashMap<DistributorName, NodeId>,
}

impl DistributorRegistry {
    /// Register `records` in order, link parents and reject cycles.
    pub fn build<I>(records: I, linking: ParentLinking) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = DistributorRecord>,
    {
        let mut nodes: Vec<Distributor> = Vec::new();
        let mut index: HashMap<DistributorName, NodeId> = HashMap::new();

        for record in records {
            if linking == ParentLinking::Ordered {
                if let Some(parent) = &record.parent {
                    if !index.contains_key(parent) {
                        return Err(RegistryError::ForwardParentReference {
                            child: record.name,
                            parent: parent.clone(),
                        });
                    }
                }
            }

            match index.get(&record.name) {
                Some(&id) => {
                    tracing::warn!(
                        distributor = %record.name,
                        "duplicate distributor record replaces earlier definition"
                    );
                    nodes[id.0] = Distributor::from(record);
                }
                None => {
                    index.insert(record.name.clone(), NodeId(nodes.len()));
                    nodes.push(Distributor::from(record));
                }
            }
        }

        for node in &mut nodes {
            if let Some(parent_name) = &node.parent_name {
                let id = index.get(parent_name).copied().ok_or_else(|| {
                    RegistryError::UnknownParent {
                        child: node.name.clone(),
                        parent: parent_name.clone(),
                    }
                })?;
                node.parent = Some(id);
            }
        }

        let registry = Self { nodes, index };
        registry.check_acyclic()?;

        tracing::debug!(
            distributors = registry.len(),
            roots = registry.roots().count(),
            %linking,
            "distributor registry built"
        );

        Ok(registry)
    }

    /// Walk each parent chain once; fail on the first revisited node.
    fn check_acyclic(&self) -> Result<(), RegistryError> {
        let mut settled: HashSet<NodeId> = HashSet::new();

        for start in 0..self.nodes.len() {
            let mut on_path: HashSet<NodeId> = HashSet::new();
            let mut chain: Vec<NodeId> = Vec::new();
            let mut cursor = Some(NodeId(start));

            while let Some(id) = cursor {
                if settled.contains(&id) {
                    break;
                }
                chain.push(id);
                if !on_path.insert(id) {
                    return Err(RegistryError::ParentCycle {
                        chain: chain
                            .iter()
                            .map(|id| self.nodes[id.0].name.clone())
                            .collect(),
                    });
                }
                cursor = self.nodes[id.0].parent;
            }

            settled.extend(chain);
        }

        Ok(())
    }

    /// Normalize `name` and look it up.
    pub fn lookup(&self, name: &str) -> Option<&Distributor> {
        let name = DistributorName::new(name).ok()?;
        self.get(&name)
    }

    /// Look up an already-normalized name.
    pub fn get(&self, name: &DistributorName) -> Option<&Distributor> {
        self.index.get(name).map(|id| &self.nodes[id.0])
    }

    /// The parent node of `distributor`, if it has one.
    pub fn parent_of(&self, distributor: &Distributor) -> Option<&Distributor> {
        distributor.parent.map(|id| &self.nodes[id.0])
    }

    /// Parent, grandparent, … up to the root.
    pub fn ancestors<'a>(
        &'a self,
        distributor: &'a Distributor,
    ) -> impl Iterator<Item = &'a Distributor> + 'a {
        std::iter::successors(self.parent_of(distributor), move |d| self.parent_of(d))
    }

    /// Distributors without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Distributor> {
        self.nodes.iter().filter(|d| d.is_root())
    }

    /// All distributors, in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Distributor> {
        self.nodes.iter()
    }

    /// Number of distinct distributors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no distributor was registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
