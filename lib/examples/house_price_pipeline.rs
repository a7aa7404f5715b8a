//! End-to-end example: train both models, save, reload and serve.
//!
//! Listings are built in code so the example runs without a dataset:
//! - fit the price regressor and the tier classifier
//! - save both artifacts and load them back
//! - answer prediction and search requests
//!
//! Run with: cargo run --example house_price_pipeline

use estate_ml::model::{InferenceModel, PriceRegressor, TierClassifier};
use estate_ml::preprocessing::PropertyFeatures;
use estate_ml::serving::{self, FilterResponse};
use estate_ml::tree::ForestParams;
use estate_ml::{
    FilterQuery, FittedPriceRegressor, FittedTierClassifier, LabelPolicy, PropertyDataset,
    PropertyRecord, SortKey,
};
use std::error::Error;

fn listings() -> PropertyDataset {
    let cities = [("Mumbai", 17_500.0), ("Pune", 7_200.0), ("Thane", 9_800.0)];
    let records = (0..90)
        .map(|i| {
            let (city, base) = cities[i % cities.len()];
            let area = 550.0 + ((i * 131) % 1_400) as f64;
            let ppsf = base + ((i * 71) % 900) as f64;
            PropertyRecord::new(
                format!("Tower {}", i),
                format!("Block {}, {}", i % 9, city),
                area,
                ppsf,
                (area * ppsf / 1_000.0).round() / 100.0,
                1 + (i % 4) as u32,
                i % 3 != 0,
            )
        })
        .collect();
    PropertyDataset::from_records(records)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Property Price Pipeline ===\n");

    let dataset = listings();
    println!("Listings: {} across {:?}", dataset.len(), dataset.cities());

    let params = ForestParams::default().with_n_estimators(50);
    let price_model = PriceRegressor::new(params).fit(&dataset)?;
    let tier_model = TierClassifier::new(params, LabelPolicy::default()).fit(&dataset)?;
    println!("Feature vector width: {}", price_model.n_features_in());

    let dir = std::env::temp_dir();
    let price_path = dir.join("estate_price_model.bin");
    let tier_path = dir.join("estate_tier_model.bin");
    price_model.save(&price_path)?;
    tier_model.save(&tier_path)?;
    println!("Saved artifacts to {:?} and {:?}", price_path, tier_path);

    let price_model = FittedPriceRegressor::load(&price_path)?;
    let tier_model = FittedTierClassifier::load(&tier_path)?;

    println!("\n=== Predictions ===\n");
    let requests = [
        PropertyFeatures {
            total_area: 1_100.0,
            price_per_sqft: 18_000.0,
            baths: 2,
            balcony: true,
            city: "Mumbai".to_string(),
        },
        PropertyFeatures {
            total_area: 850.0,
            price_per_sqft: 7_000.0,
            baths: 1,
            balcony: false,
            city: "Pune".to_string(),
        },
        PropertyFeatures {
            total_area: 900.0,
            price_per_sqft: 6_000.0,
            baths: 2,
            balcony: true,
            city: "Nagpur".to_string(),
        },
    ];
    for request in &requests {
        let price = serving::predict_price(&price_model, request)?;
        let tier = serving::classify_tier(&tier_model, request)?;
        println!(
            "  {:<7} {:>6.0} sqft -> {:>7.2} lakhs, {}",
            request.city, request.total_area, price.price_lakhs, tier.label
        );
    }
    println!(
        "  Unseen cities encoded so far: {}",
        price_model.transformer().unseen_category_count()
    );

    println!("\n=== Search ===\n");
    let query = FilterQuery::new(90.0, "Pune", 800.0, 2).with_sort_key(SortKey::AreaDesc);
    match serving::search(&dataset, &query)? {
        FilterResponse::Matches { count, properties } => {
            println!("{} matches", count);
            for p in properties.iter().take(5) {
                println!(
                    "  {:<10} {:>6.0} sqft {:>7.2} lakhs",
                    p.name, p.total_area, p.price_lakhs
                );
            }
        }
        FilterResponse::NoMatches => println!("no matching properties"),
    }

    std::fs::remove_file(price_path)?;
    std::fs::remove_file(tier_path)?;
    println!("\n=== Pipeline Complete ===");
    Ok(())
}
