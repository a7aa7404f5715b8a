//! Ordered category vocabulary learned at fit time.

use crate::error::EstateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The distinct category strings observed while fitting, in column order.
///
/// Categories are kept sorted by byte value and deduplicated, so the
/// one-hot column order depends only on *which* categories were seen, not on
/// row order. Matching is exact: no case folding, no trimming.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Build a vocabulary from the observed values.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set: BTreeSet<&str> = values.into_iter().collect();
        Self {
            categories: set.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Rebuild a vocabulary from persisted categories.
    ///
    /// # Errors
    /// [`EstateError::InvalidArtifact`] unless the categories are strictly
    /// increasing (sorted and free of duplicates).
    pub fn from_sorted(categories: Vec<String>) -> Result<Self, EstateError> {
        let vocab = Self { categories };
        vocab.validate()?;
        Ok(vocab)
    }

    /// Check the ordering invariant.
    pub fn validate(&self) -> Result<(), EstateError> {
        if let Some(pos) = self.categories.windows(2).position(|w| w[0] >= w[1]) {
            return Err(EstateError::InvalidArtifact(format!(
                "vocabulary not strictly sorted at position {}: {:?} >= {:?}",
                pos,
                self.categories[pos],
                self.categories[pos + 1]
            )));
        }
        Ok(())
    }

    /// Column index of `value`, or `None` if it was not seen at fit time.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in column order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}
