//! # distauth-engine — Territory Authorization Engine
//!
//! Answers one question: may this distributor operate in this region?
//!
//! - **Catalog** (`catalog.rs`): the set of known regions, keyed by full
//!   `CITY-STATE-COUNTRY`, with every suffix indexed for existence checks.
//!
//! - **Registry** (`registry.rs`): the distributor forest. Owns every node;
//!   parents are relations resolved by name at build time, with cycle
//!   detection and a choice of two-pass or ordered linking.
//!
//! - **Engine** (`engine.rs`): the decision procedure. Unknown region →
//!   deny; parent denied → deny; exclude match → deny; include match →
//!   allow; otherwise deny.
//!
//! - **Loader** (`loader.rs`): CSV readers for city and distributor records.
//!
//! ## Lifecycle
//!
//! ```text
//! cities.csv ───────▶ RegionCatalog ──────┐
//!                                         ├──▶ AuthorizationEngine ──▶ Decision
//! distributors.csv ─▶ DistributorRegistry ┘
//! ```
//!
//! Catalog and registry are built once and never mutated; the engine holds
//! shared references to both. There is no global state.
//!
//! ## Example
//!
//! ```
//! use distauth_core::{City, DistributorName, RegionPattern};
//! use distauth_engine::{
//!     AuthorizationEngine, DistributorRecord, DistributorRegistry, ParentLinking, RegionCatalog,
//! };
//!
//! let catalog = RegionCatalog::build([City::new("Paris", "Ile de France", "France")]);
//! let registry = DistributorRegistry::build(
//!     [DistributorRecord::new(DistributorName::new("acme").unwrap())
//!         .including([RegionPattern::new("france").unwrap()])],
//!     ParentLinking::TwoPass,
//! )
//! .unwrap();
//!
//! let engine = AuthorizationEngine::new(&catalog, &registry);
//! let acme = registry.lookup("Acme").unwrap();
//! assert!(engine.authorize(acme, "Paris-IleDeFrance-France").is_allowed());
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod loader;
pub mod registry;

pub use catalog::RegionCatalog;
pub use engine::{AuthorizationEngine, Decision};
pub use error::{LoadError, RegistryError};
pub use loader::{load_cities, load_distributors, read_cities, read_distributors};
pub use registry::{Distributor, DistributorRecord, DistributorRegistry, ParentLinking};
