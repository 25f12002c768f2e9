//! # CSV Loaders
//!
//! Reads the two tabular inputs into a [`RegionCatalog`] and a
//! [`DistributorRegistry`]. Both inputs start with a header row, which is
//! skipped, and every row must have as many fields as the header.
//!
//! ## City records
//!
//! Columns 3, 4 and 5 (zero-based) are city, state and country. All other
//! columns are ignored.
//!
//! ## Distributor records
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | name |
//! | 1 | include patterns, `\|`-delimited |
//! | 2 | exclude patterns, `\|`-delimited |
//! | 3 | parent name, may be empty |
//!
//! Blank items inside a pattern list are dropped, so an empty column means
//! "no patterns".
//!
//! Loading is all-or-nothing: the first bad row aborts with a [`LoadError`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use distauth_core::{City, DistributorName, RegionPattern, ValidationError};

use crate::catalog::RegionCatalog;
use crate::error::LoadError;
use crate::registry::{DistributorRecord, DistributorRegistry, ParentLinking};

/// Separator between patterns inside an include/exclude column.
pub const PATTERN_DELIMITER: char = '|';

const CITY_INPUT: &str = "city";
const DISTRIBUTOR_INPUT: &str = "distributor";

const CITY_COLUMN: usize = 3;
const STATE_COLUMN: usize = 4;
const COUNTRY_COLUMN: usize = 5;
const CITY_MIN_FIELDS: usize = COUNTRY_COLUMN + 1;

const NAME_COLUMN: usize = 0;
const INCLUDE_COLUMN: usize = 1;
const EXCLUDE_COLUMN: usize = 2;
const PARENT_COLUMN: usize = 3;
const DISTRIBUTOR_MIN_FIELDS: usize = PARENT_COLUMN + 1;

/// Open `path` and read city records from it.
pub fn load_cities(path: impl AsRef<Path>) -> Result<RegionCatalog, LoadError> {
    let path = path.as_ref();
    let catalog = read_cities(open(path)?)?;
    tracing::info!(path = %path.display(), regions = catalog.len(), "loaded cities");
    Ok(catalog)
}

/// Open `path` and read distributor records from it.
pub fn load_distributors(
    path: impl AsRef<Path>,
    linking: ParentLinking,
) -> Result<DistributorRegistry, LoadError> {
    let path = path.as_ref();
    let registry = read_distributors(open(path)?, linking)?;
    tracing::info!(
        path = %path.display(),
        distributors = registry.len(),
        "loaded distributors"
    );
    Ok(registry)
}

/// Read city records from any reader.
pub fn read_cities<R: Read>(reader: R) -> Result<RegionCatalog, LoadError> {
    let mut cities = Vec::new();
    for row in csv_reader(reader).records() {
        let record = row.map_err(|source| LoadError::Csv {
            input: CITY_INPUT,
            source,
        })?;
        require_fields(&record, CITY_INPUT, CITY_MIN_FIELDS)?;
        cities.push(City::new(
            &record[CITY_COLUMN],
            &record[STATE_COLUMN],
            &record[COUNTRY_COLUMN],
        ));
    }
    Ok(RegionCatalog::build(cities))
}

/// Read distributor records from any reader and build the registry.
pub fn read_distributors<R: Read>(
    reader: R,
    linking: ParentLinking,
) -> Result<DistributorRegistry, LoadError> {
    let mut records = Vec::new();
    for row in csv_reader(reader).records() {
        let record = row.map_err(|source| LoadError::Csv {
            input: DISTRIBUTOR_INPUT,
            source,
        })?;
        records.push(parse_distributor(&record)?);
    }
    Ok(DistributorRegistry::build(records, linking)?)
}

fn parse_distributor(record: &StringRecord) -> Result<DistributorRecord, LoadError> {
    require_fields(record, DISTRIBUTOR_INPUT, DISTRIBUTOR_MIN_FIELDS)?;
    let invalid = |source: ValidationError| LoadError::InvalidField {
        input: DISTRIBUTOR_INPUT,
        line: line_of(record),
        source,
    };

    let name = DistributorName::new(&record[NAME_COLUMN]).map_err(invalid)?;
    let include = parse_patterns(&record[INCLUDE_COLUMN]).map_err(invalid)?;
    let exclude = parse_patterns(&record[EXCLUDE_COLUMN]).map_err(invalid)?;
    // Blank parent column means a root distributor.
    let parent = DistributorName::new(&record[PARENT_COLUMN]).ok();

    Ok(DistributorRecord {
        name,
        include,
        exclude,
        parent,
    })
}

/// Split a `|`-delimited column into validated patterns, skipping blanks.
pub fn parse_patterns(column: &str) -> Result<Vec<RegionPattern>, ValidationError> {
    column
        .split(PATTERN_DELIMITER)
        .filter(|item| !item.trim().is_empty())
        .map(RegionPattern::new)
        .collect()
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader)
}

fn require_fields(
    record: &StringRecord,
    input: &'static str,
    expected: usize,
) -> Result<(), LoadError> {
    if record.len() < expected {
        return Err(LoadError::ShortRow {
            input,
            line: line_of(record),
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}
