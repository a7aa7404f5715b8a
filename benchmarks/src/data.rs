use estate_ml::{PropertyDataset, PropertyRecord};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cities with a base price per square foot in rupees.
pub const CITIES: [(&str, f64); 6] = [
    ("Mumbai", 18_000.0),
    ("Pune", 7_000.0),
    ("Thane", 9_500.0),
    ("Navi Mumbai", 11_000.0),
    ("Nashik", 4_500.0),
    ("Nagpur", 5_000.0),
];

/// Generate `n` listings spread evenly over [`CITIES`].
pub fn synthetic_listings(n: usize, seed: u64) -> PropertyDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let area = Uniform::new(450.0_f64, 2_600.0);
    let jitter = Uniform::new(0.85_f64, 1.15);

    let records = (0..n)
        .map(|i| {
            let (city, base) = CITIES[i % CITIES.len()];
            let total_area: f64 = area.sample(&mut rng).round();
            let ppsf: f64 = (base * jitter.sample(&mut rng)).round();
            let price_lakhs = (total_area * ppsf / 100_000.0 * 100.0).round() / 100.0;
            PropertyRecord::new(
                format!("Listing {}", i),
                format!("Sector {}, {}", rng.gen_range(1..40), city),
                total_area,
                ppsf,
                price_lakhs,
                rng.gen_range(1..=4),
                rng.gen_bool(0.5),
            )
        })
        .collect();
    PropertyDataset::from_records(records)
}
