//! Per-city market summaries.

use crate::dataset::PropertyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Five-number summary of a sample, with linear interpolation between
/// order statistics for the quartiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Distribution {
    /// `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityInsight {
    pub city: String,
    pub listings: usize,
    pub mean_price_lakhs: f64,
    pub mean_price_per_sqft: f64,
    pub area: Distribution,
}

#[derive(Default)]
struct Accumulator {
    price_sum: f64,
    ppsf_sum: f64,
    areas: Vec<f64>,
}

/// Aggregate listings by city, most expensive city first. Cities with
/// equal mean price are ordered by name.
pub fn city_insights<'a, I>(records: I) -> Vec<CityInsight>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut by_city: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for record in records {
        let acc = by_city.entry(record.city.as_str()).or_default();
        acc.price_sum += record.price_lakhs;
        acc.ppsf_sum += record.price_per_sqft;
        acc.areas.push(record.total_area);
    }

    let mut insights: Vec<CityInsight> = by_city
        .into_iter()
        .filter_map(|(city, acc)| {
            let area = Distribution::from_values(&acc.areas)?;
            let n = area.count as f64;
            Some(CityInsight {
                city: city.to_string(),
                listings: area.count,
                mean_price_lakhs: acc.price_sum / n,
                mean_price_per_sqft: acc.ppsf_sum / n,
                area,
            })
        })
        .collect();

    // BTreeMap order already sorts by name, so a stable sort keeps ties by name
    insights.sort_by(|a, b| b.mean_price_lakhs.total_cmp(&a.mean_price_lakhs));
    insights
}
