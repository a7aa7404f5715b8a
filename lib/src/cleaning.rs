//! Normalisation of raw listing exports into the loader's table format.
//!
//! Raw exports carry the asking price as display text such as `₹45 L` or
//! `₹1.2 Cr`. Cleaning converts it to a numeric `Price_Lakhs` column,
//! trims `Location`, adds the derived `City`, and drops rows whose price
//! cannot be read. Every other column is copied unchanged.

use crate::dataset::derive_city;
use crate::error::EstateError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Lakhs in one crore.
pub const LAKHS_PER_CRORE: f64 = 100.0;

/// Parse a display price into lakhs.
///
/// The rupee sign and surrounding whitespace are ignored. Text containing
/// `Cr` is read as crores, otherwise text containing `L` as lakhs; anything
/// else yields `None`. Only digits and `.` count toward the number.
///
/// ```rust
/// use estate_ml::cleaning::parse_price_lakhs;
///
/// assert_eq!(parse_price_lakhs("₹45 L"), Some(45.0));
/// assert_eq!(parse_price_lakhs("₹1.2 Cr"), Some(120.0));
/// assert_eq!(parse_price_lakhs("Price on request"), None);
/// ```
pub fn parse_price_lakhs(raw: &str) -> Option<f64> {
    let text = raw.replace('₹', "");
    let text = text.trim();
    let scale = if text.contains("Cr") {
        LAKHS_PER_CRORE
    } else if text.contains('L') {
        1.0
    } else {
        return None;
    };
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = digits.parse().ok()?;
    let lakhs = value * scale;
    (lakhs.is_finite() && lakhs > 0.0).then_some(lakhs)
}

/// Row counts from one cleaning pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub kept: usize,
    pub dropped: usize,
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, EstateError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| EstateError::DataFormat(format!("missing required column: {}", name)))
}

/// Clean a raw CSV export from `reader` into `writer`.
///
/// `Price_Lakhs` and `City` are overwritten when the input already has
/// them, and appended otherwise.
pub fn clean_listings<R: Read, W: Write>(
    reader: R,
    writer: W,
) -> Result<CleaningSummary, EstateError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut headers = rdr.headers()?.clone();
    let price_col = column(&headers, "Price")?;
    let location_col = column(&headers, "Location")?;

    let mut output_column = |name: &str| match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push_field(name);
            headers.len() - 1
        }
    };
    let lakhs_col = output_column("Price_Lakhs");
    let city_col = output_column("City");
    let width = headers.len();

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;

    let mut summary = CleaningSummary::default();
    for (idx, row) in rdr.records().enumerate() {
        let row = row?;
        let Some(lakhs) = row.get(price_col).and_then(parse_price_lakhs) else {
            tracing::debug!(
                line = idx + 2,
                price = ?row.get(price_col),
                "dropping row with unreadable price"
            );
            summary.dropped += 1;
            continue;
        };
        let location = row.get(location_col).unwrap_or_default().trim().to_string();
        let city = derive_city(&location).to_string();

        let mut fields: Vec<String> = row.iter().map(str::to_string).collect();
        fields.resize(width, String::new());
        fields[location_col] = location;
        fields[lakhs_col] = lakhs.to_string();
        fields[city_col] = city;
        wtr.write_record(&fields)?;
        summary.kept += 1;
    }
    wtr.flush()?;

    if summary.dropped > 0 {
        tracing::warn!(
            dropped = summary.dropped,
            kept = summary.kept,
            "dropped rows with unreadable prices"
        );
    }
    Ok(summary)
}

/// File-to-file wrapper around [`clean_listings`].
pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<CleaningSummary, EstateError> {
    let reader = BufReader::new(File::open(&input)?);
    let writer = BufWriter::new(File::create(&output)?);
    let summary = clean_listings(reader, writer)?;
    tracing::info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        kept = summary.kept,
        dropped = summary.dropped,
        "cleaned listings"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PropertyDataset;

    #[test]
    fn test_parse_price_lakhs() {
        assert_eq!(parse_price_lakhs("₹45 L"), Some(45.0));
        assert_eq!(parse_price_lakhs(" ₹ 99.5 L "), Some(99.5));
        assert_eq!(parse_price_lakhs("₹1.2 Cr"), Some(120.0));
        assert_eq!(parse_price_lakhs("₹3 Cr"), Some(300.0));
        assert_eq!(parse_price_lakhs("4500000"), None);
        assert_eq!(parse_price_lakhs("₹ L"), None);
        assert_eq!(parse_price_lakhs(""), None);
    }

    #[test]
    fn test_clean_listings_appends_columns() {
        let raw = "\
Name,Price,Location,Total_Area,Price_per_SQFT,Baths,Balcony
Sunrise,₹80 L,\"  Baner, Pune \",900,8888,2,Yes
Skyline,₹1.5 Cr,Worli,1200,12500,3,No
Mystery,Call for price,\"X, Pune\",800,7000,2,No
";
        let mut out = Vec::new();
        let summary = clean_listings(raw.as_bytes(), &mut out).unwrap();
        assert_eq!(summary, CleaningSummary { kept: 2, dropped: 1 });

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,Price,Location,Total_Area,Price_per_SQFT,Baths,Balcony,Price_Lakhs,City"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Sunrise,₹80 L,\"Baner, Pune\",900,8888,2,Yes,80,Pune"
        );
        assert_eq!(lines.next().unwrap(), "Skyline,₹1.5 Cr,Worli,1200,12500,3,No,150,Worli");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_cleaned_output_loads() {
        let raw = "\
Name,Price,Location,Total_Area,Price_per_SQFT,Baths,Balcony
Sunrise,₹80 L,\"Baner, Pune\",900,8888,2,Yes
";
        let mut out = Vec::new();
        clean_listings(raw.as_bytes(), &mut out).unwrap();
        let ds = PropertyDataset::from_reader(out.as_slice()).unwrap();
        assert_eq!(ds.records()[0].price_lakhs, 80.0);
        assert_eq!(ds.records()[0].city, "Pune");
    }

    #[test]
    fn test_existing_output_columns_are_overwritten() {
        let raw = "Name,Price,Location,City\nA,₹2 Cr, Thane ,stale\n";
        let mut out = Vec::new();
        clean_listings(raw.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Name,Price,Location,City,Price_Lakhs\nA,₹2 Cr,Thane,Thane,200\n");
    }

    #[test]
    fn test_missing_price_column() {
        let raw = "Name,Location\nA,Pune\n";
        let err = clean_listings(raw.as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, EstateError::DataFormat(_)));
    }

    #[test]
    fn test_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        let output = dir.path().join("clean.csv");
        std::fs::write(&input, "Name,Price,Location\nA,₹10 L,\"x, Pune\"\n").unwrap();
        let summary = clean_file(&input, &output).unwrap();
        assert_eq!(summary.kept, 1);
        assert!(std::fs::read_to_string(&output).unwrap().ends_with("10,Pune\n"));
    }
}
