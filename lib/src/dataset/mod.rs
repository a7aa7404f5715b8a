//! Property listings loaded from a flat CSV table.
//!
//! # Core Concepts
//!
//! - **PropertyRecord**: one listing with its derived `city`.
//! - **PropertyDataset**: an in-memory, ordered collection of records. Row
//!   order is the file order and is preserved by every derived view.
//!
//! The city is derived exactly once, here, from the composite `Location`
//! field. Training, search and insights all read `record.city`, so the
//! derivation can never drift between call sites.
//!
//! # Example
//!
//! ```rust
//! use estate_ml::dataset::PropertyDataset;
//!
//! let csv = "\
//! Name,Location,Price_Lakhs,Total_Area,Price_per_SQFT,Baths,Balcony
//! Sunrise,\"Baner, Pune\",80,900,8888,2,Yes
//! ";
//! let dataset = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
//! assert_eq!(dataset.records()[0].city, "Pune");
//! ```

use crate::error::EstateError;
use crate::preprocessing::balcony_flag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub mod split;
pub use self::split::{stratified_split, train_test_split};

/// Column names the loader requires, case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Name",
    "Location",
    "Price_Lakhs",
    "Total_Area",
    "Price_per_SQFT",
    "Baths",
    "Balcony",
];

/// Derive the city from a composite location string.
///
/// The city is the last comma-separated segment with surrounding whitespace
/// removed. A location without any comma is returned verbatim.
///
/// ```rust
/// use estate_ml::dataset::derive_city;
///
/// assert_eq!(derive_city("123 Main St, Pune"), "Pune");
/// assert_eq!(derive_city("StandaloneVilla"), "StandaloneVilla");
/// ```
pub fn derive_city(location: &str) -> &str {
    match location.rsplit_once(',') {
        Some((_, last)) => last.trim(),
        None => location,
    }
}

/// A single property listing.
///
/// `price_lakhs` and `total_area * price_per_sqft` are independently
/// observed and are not cross-checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    /// Composite location, comma separated; the last segment is the city.
    pub location: String,
    /// Derived from `location` by [`derive_city`].
    pub city: String,
    /// Total area in square feet.
    pub total_area: f64,
    pub price_per_sqft: f64,
    /// Price in lakhs (1 lakh = 100,000 currency units).
    pub price_lakhs: f64,
    pub baths: u32,
    pub balcony: bool,
}

impl PropertyRecord {
    /// Build a record, deriving `city` from `location`.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        total_area: f64,
        price_per_sqft: f64,
        price_lakhs: f64,
        baths: u32,
        balcony: bool,
    ) -> Self {
        let location = location.into();
        let city = derive_city(&location).to_string();
        Self {
            name: name.into(),
            location,
            city,
            total_area,
            price_per_sqft,
            price_lakhs,
            baths,
            balcony,
        }
    }
}

/// One raw CSV row, before validation.
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Price_Lakhs")]
    price_lakhs: f64,
    #[serde(rename = "Total_Area")]
    total_area: f64,
    #[serde(rename = "Price_per_SQFT")]
    price_per_sqft: f64,
    #[serde(rename = "Baths")]
    baths: f64,
    #[serde(rename = "Balcony")]
    balcony: Option<String>,
}

impl RawListing {
    fn into_record(self, line: usize) -> Result<PropertyRecord, EstateError> {
        let positive = |column: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(EstateError::DataFormat(format!(
                    "line {}: {} must be a positive number, got {}",
                    line, column, value
                )))
            }
        };
        let total_area = positive("Total_Area", self.total_area)?;
        let price_per_sqft = positive("Price_per_SQFT", self.price_per_sqft)?;
        let price_lakhs = positive("Price_Lakhs", self.price_lakhs)?;

        if !self.baths.is_finite()
            || self.baths < 1.0
            || self.baths.fract() != 0.0
            || self.baths > u32::MAX as f64
        {
            return Err(EstateError::DataFormat(format!(
                "line {}: Baths must be an integer >= 1, got {}",
                line, self.baths
            )));
        }

        Ok(PropertyRecord::new(
            self.name,
            self.location.trim(),
            total_area,
            price_per_sqft,
            price_lakhs,
            self.baths as u32,
            balcony_flag(self.balcony.as_deref()),
        ))
    }
}

/// An ordered, in-memory collection of property listings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyDataset {
    records: Vec<PropertyRecord>,
}

impl PropertyDataset {
    /// Wrap already-built records.
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// - [`EstateError::Io`] if the file cannot be read
    /// - [`EstateError::DataFormat`] if a required column is missing or a value is invalid
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EstateError> {
        let file = File::open(&path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.as_ref().display(),
            rows = dataset.len(),
            "loaded property dataset"
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, EstateError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(EstateError::DataFormat(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for (idx, row) in rdr.deserialize::<RawListing>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let raw = row.map_err(|e| EstateError::DataFormat(format!("line {}: {}", line, e)))?;
            records.push(raw.into_record(line)?);
        }

        Ok(Self { records })
    }

    /// All records in file order.
    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    /// Iterate over the records in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct cities, sorted.
    pub fn cities(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Select rows by index, in the order given.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyDataset {
    type Item = &'a PropertyRecord;
    type IntoIter = std::slice::Iter<'a, PropertyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name,Location,Price_Lakhs,Total_Area,Price_per_SQFT,Baths,Balcony";

    fn csv_with(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for row in rows {
            s.push('\n');
            s.push_str(row);
        }
        s
    }

    #[test]
    fn test_derive_city_last_segment_trimmed() {
        assert_eq!(derive_city("123 Main St, Pune"), "Pune");
        assert_eq!(derive_city("Flat 4, Baner,  Pune  "), "Pune");
    }

    #[test]
    fn test_derive_city_without_comma_is_verbatim() {
        assert_eq!(derive_city("StandaloneVilla"), "StandaloneVilla");
        assert_eq!(derive_city(" Villa "), " Villa ");
    }

    #[test]
    fn test_load_valid_rows() {
        let csv = csv_with(&[
            "Sunrise,\"Baner, Pune\",80,900,8888,2,Yes",
            "Lakeview,Mumbai,120.5,1100,10954,3,no",
        ]);
        let ds = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records()[0];
        assert_eq!(first.city, "Pune");
        assert_eq!(first.baths, 2);
        assert!(first.balcony);

        let second = &ds.records()[1];
        assert_eq!(second.city, "Mumbai");
        assert!((second.price_lakhs - 120.5).abs() < 1e-12);
        assert!(!second.balcony);
    }

    #[test]
    fn test_load_trims_location() {
        let csv = csv_with(&["A,\"  Wakad, Pune  \",50,700,7000,1,Yes"]);
        let ds = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].location, "Wakad, Pune");
        assert_eq!(ds.records()[0].city, "Pune");
    }

    #[test]
    fn test_load_empty_balcony_is_false() {
        let csv = csv_with(&["A,Pune,50,700,7000,1,"]);
        let ds = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
        assert!(!ds.records()[0].balcony);
    }

    #[test]
    fn test_load_ignores_extra_columns() {
        let csv = "Name,Price,Location,Price_Lakhs,Total_Area,Price_per_SQFT,Baths,Balcony,City\n\
                   A,₹50 L,\"X, Pune\",50,700,7000,1,Yes,Ignored";
        let ds = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].city, "Pune");
    }

    #[test]
    fn test_load_missing_column() {
        let csv = "Name,Location,Price_Lakhs,Total_Area,Price_per_SQFT,Balcony\nA,Pune,50,700,7000,Yes";
        let err = PropertyDataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            EstateError::DataFormat(msg) => assert!(msg.contains("Baths")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_unparsable_number() {
        let csv = csv_with(&["A,Pune,fifty,700,7000,1,Yes"]);
        let err = PropertyDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EstateError::DataFormat(_)));
    }

    #[test]
    fn test_load_rejects_fractional_baths() {
        let csv = csv_with(&["A,Pune,50,700,7000,1.5,Yes"]);
        let err = PropertyDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EstateError::DataFormat(_)));
    }

    #[test]
    fn test_load_rejects_non_positive_area() {
        let csv = csv_with(&["A,Pune,50,0,7000,1,Yes"]);
        let err = PropertyDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EstateError::DataFormat(_)));
    }

    #[test]
    fn test_cities_sorted_unique() {
        let ds = PropertyDataset::from_records(vec![
            PropertyRecord::new("a", "x, Pune", 1.0, 1.0, 1.0, 1, false),
            PropertyRecord::new("b", "y, Mumbai", 1.0, 1.0, 1.0, 1, false),
            PropertyRecord::new("c", "z, Pune", 1.0, 1.0, 1.0, 1, false),
        ]);
        assert_eq!(ds.cities(), vec!["Mumbai", "Pune"]);
    }

    #[test]
    fn test_subset_keeps_given_order() {
        let ds = PropertyDataset::from_records(vec![
            PropertyRecord::new("a", "Pune", 1.0, 1.0, 1.0, 1, false),
            PropertyRecord::new("b", "Pune", 1.0, 1.0, 1.0, 1, false),
            PropertyRecord::new("c", "Pune", 1.0, 1.0, 1.0, 1, false),
        ]);
        let sub = ds.subset(&[2, 0]);
        let names: Vec<_> = sub.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }
}
