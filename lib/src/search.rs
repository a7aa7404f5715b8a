//! Budget-constrained property search.
//!
//! A [`FilterQuery`] selects records whose price fits the budget, in the
//! requested city, with at least the given area and bathroom count, and
//! orders them by one key. Searching borrows the records and never mutates
//! them; ties keep their input order.

use crate::dataset::PropertyRecord;
use crate::error::EstateError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Result ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::AreaAsc,
        SortKey::AreaDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::AreaAsc => "area_asc",
            SortKey::AreaDesc => "area_desc",
        }
    }

    fn compare(self, a: &PropertyRecord, b: &PropertyRecord) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price_lakhs.total_cmp(&b.price_lakhs),
            SortKey::PriceDesc => b.price_lakhs.total_cmp(&a.price_lakhs),
            SortKey::AreaAsc => a.total_area.total_cmp(&b.total_area),
            SortKey::AreaDesc => b.total_area.total_cmp(&a.total_area),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                EstateError::InvalidInput(format!(
                    "unknown sort key '{}', expected one of price_asc, price_desc, area_asc, area_desc",
                    s
                ))
            })
    }
}

/// Search constraints. All four predicates must hold.
///
/// This is also the body of a filter request at the serving boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Inclusive upper bound on `price_lakhs`.
    pub max_price: f64,
    /// Exact, case-sensitive city match.
    pub city: String,
    /// Inclusive lower bound on `total_area`.
    pub min_area: f64,
    /// Inclusive lower bound on `baths`.
    pub min_baths: u32,
    #[serde(default)]
    pub sort_key: SortKey,
}

impl FilterQuery {
    pub fn new(max_price: f64, city: impl Into<String>, min_area: f64, min_baths: u32) -> Self {
        Self {
            max_price,
            city: city.into(),
            min_area,
            min_baths,
            sort_key: SortKey::default(),
        }
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Reject bounds that no comparison could honour.
    pub fn validate(&self) -> Result<(), EstateError> {
        if self.max_price.is_nan() {
            return Err(EstateError::InvalidInput("max_price is NaN".to_string()));
        }
        if self.min_area.is_nan() {
            return Err(EstateError::InvalidInput("min_area is NaN".to_string()));
        }
        Ok(())
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        record.price_lakhs <= self.max_price
            && record.city == self.city
            && record.total_area >= self.min_area
            && record.baths >= self.min_baths
    }
}

/// Ordered matches of a search. An empty result is a normal outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<'a> {
    matches: Vec<&'a PropertyRecord>,
}

impl<'a> SearchResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn records(&self) -> &[&'a PropertyRecord] {
        &self.matches
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PropertyRecord> + '_ {
        self.matches.iter().copied()
    }

    /// Clone the matched records out of the borrowed dataset.
    pub fn to_records(&self) -> Vec<PropertyRecord> {
        self.matches.iter().map(|r| (*r).clone()).collect()
    }
}

impl<'a> IntoIterator for SearchResult<'a> {
    type Item = &'a PropertyRecord;
    type IntoIter = std::vec::IntoIter<&'a PropertyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

/// Select and order the records that satisfy `query`.
///
/// # Example
/// ```rust
/// use estate_ml::dataset::PropertyRecord;
/// use estate_ml::search::{filter, FilterQuery};
///
/// let records = vec![
///     PropertyRecord::new("A", "Baner, Pune", 900.0, 8900.0, 80.0, 2, true),
///     PropertyRecord::new("B", "Wakad, Pune", 1100.0, 10900.0, 120.0, 3, false),
/// ];
/// let query = FilterQuery::new(100.0, "Pune", 800.0, 1);
/// let result = filter(&records, &query).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.records()[0].name, "A");
/// ```
pub fn filter<'a, I>(records: I, query: &FilterQuery) -> Result<SearchResult<'a>, EstateError>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    query.validate()?;
    let mut matches: Vec<&PropertyRecord> =
        records.into_iter().filter(|r| query.matches(r)).collect();
    // stable: equal keys keep input order
    matches.sort_by(|a, b| query.sort_key.compare(a, b));
    tracing::debug!(
        city = %query.city,
        max_price = query.max_price,
        sort_key = %query.sort_key,
        matches = matches.len(),
        "filtered listings"
    );
    Ok(SearchResult { matches })
}
