//! # Region Catalog
//!
//! The set of known regions, keyed by full `CITY-STATE-COUNTRY`. Built once
//! from city records and read-only afterwards.
//!
//! ## Existence
//!
//! A region exists if it is a catalog key or a trailing dash-delimited
//! suffix of one, so `FRANCE` and `ILEDEFRANCE-FRANCE` exist as soon as
//! `PARIS-ILEDEFRANCE-FRANCE` is loaded. Every suffix is indexed at build
//! time; [`RegionCatalog::exists`] is a single hash lookup.

use std::collections::{HashMap, HashSet};

use distauth_core::{City, RegionKey};

/// Immutable set of known regions.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    entries: HashMap<RegionKey, City>,
    scopes: HashSet<String>,
}

impl RegionCatalog {
    /// Build the catalog from city records. Duplicate keys overwrite
    /// earlier entries.
    pub fn build<I>(cities: I) -> Self
    where
        I: IntoIterator<Item = City>,
    {
        let mut entries = HashMap::new();
        for city in cities {
            entries.insert(city.key(), city);
        }

        let scopes = entries
            .keys()
            .flat_map(|key| key.scopes().map(str::to_owned))
            .collect::<HashSet<_>>();

        tracing::debug!(
            regions = entries.len(),
            scopes = scopes.len(),
            "region catalog built"
        );

        Self { entries, scopes }
    }

    /// Whether `region` is a known full key or a suffix of one.
    pub fn exists(&self, region: &RegionKey) -> bool {
        self.scopes.contains(region.as_str())
    }

    /// The catalog entry for a full key.
    pub fn get(&self, key: &RegionKey) -> Option<&City> {
        self.entries.get(key)
    }

    /// Number of distinct full keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no city was loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionKey, &City)> {
        self.entries.iter()
    }
}

impl FromIterator<City> for RegionCatalog {
    fn from_iter<I: IntoIterator<Item = City>>(iter: I) -> Self {
        Self::build(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RegionCatalog {
        RegionCatalog::build([
            City::new("Paris", "Ile de France", "France"),
            City::new("Lyon", "Auvergne", "France"),
            City::new("Berlin", "Berlin", "Germany"),
        ])
    }

    #[test]
    fn build_keys_by_normalized_triple() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        let paris = catalog
            .get(&RegionKey::new("PARIS-ILEDEFRANCE-FRANCE"))
            .unwrap();
        assert_eq!(paris.state, "ILEDEFRANCE");
    }

    #[test]
    fn exact_key_exists() {
        assert!(catalog().exists(&RegionKey::new("paris-ile de france-france")));
    }

    #[test]
    fn proper_suffixes_exist() {
        let catalog = catalog();
        assert!(catalog.exists(&RegionKey::new("ILEDEFRANCE-FRANCE")));
        assert!(catalog.exists(&RegionKey::new("FRANCE")));
        assert!(catalog.exists(&RegionKey::new("BERLIN-GERMANY")));
    }

    #[test]
    fn unknown_regions_do_not_exist() {
        let catalog = catalog();
        assert!(!catalog.exists(&RegionKey::new("MADRID-MADRID-SPAIN")));
        assert!(!catalog.exists(&RegionKey::new("SPAIN")));
        // Known city in the wrong state.
        assert!(!catalog.exists(&RegionKey::new("PARIS-AUVERGNE-FRANCE")));
    }

    #[test]
    fn partial_field_suffix_does_not_exist() {
        // A string suffix that is not a whole field.
        assert!(!catalog().exists(&RegionKey::new("ANCE")));
    }

    #[test]
    fn empty_region_does_not_exist() {
        assert!(!catalog().exists(&RegionKey::new("   ")));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let catalog = RegionCatalog::build([
            City {
                city: "PARIS".into(),
                state: "ILEDEFRANCE".into(),
                country: "FRANCE".into(),
            },
            City::new("paris", "iledefrance", "france"),
        ]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn empty_catalog_knows_nothing() {
        let catalog = RegionCatalog::default();
        assert!(catalog.is_empty());
        assert!(!catalog.exists(&RegionKey::new("FRANCE")));
    }

    #[test]
    fn collects_from_iterator() {
        let catalog: RegionCatalog = vec![City::new("Lyon", "Auvergne", "France")]
            .into_iter()
            .collect();
        assert_eq!(catalog.iter().count(), 1);
    }
}
