pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{
    CleanArgs, Commands, InsightsArgs, PredictArgs, RoiArgs, SearchArgs, TrainArgs,
};
use estate_ml::cleaning::clean_file;
use estate_ml::insights::city_insights;
use estate_ml::pipeline::{train_price_model, train_tier_model};
use estate_ml::preprocessing::PropertyFeatures;
use estate_ml::roi::{estimate_roi, RoiInput};
use estate_ml::serving::{self, FilterResponse};
use estate_ml::{
    FilterQuery, FittedPriceRegressor, FittedTierClassifier, PipelineConfig, PropertyDataset,
};
use serde::Serialize;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "estate",
    version,
    about = "Train, serve and search real-estate price models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Clean(args) => run_clean(args),
            Commands::TrainPrice(args) => run_train_price(args),
            Commands::TrainTier(args) => run_train_tier(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Classify(args) => run_classify(args),
            Commands::Search(args) => run_search(args),
            Commands::Insights(args) => run_insights(args),
            Commands::Roi(args) => run_roi(args),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_dataset(path: &Path) -> Result<PropertyDataset> {
    PropertyDataset::load(path)
        .with_context(|| format!("failed to load listings from {}", path.display()))
}

fn pipeline_config(args: &TrainArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(n) = args.n_estimators {
        config.forest.n_estimators = n;
    }
    if let Some(seed) = args.seed {
        config.forest.random_state = seed;
        config.split.random_state = seed;
    }
    config.validate()?;
    Ok(config)
}

fn features(args: &PredictArgs) -> PropertyFeatures {
    PropertyFeatures {
        total_area: args.area,
        price_per_sqft: args.price_per_sqft,
        baths: args.baths,
        balcony: args.balcony,
        city: args.city.clone(),
    }
}

fn run_clean(args: CleanArgs) -> Result<()> {
    let summary = clean_file(&args.input, &args.output)
        .with_context(|| format!("failed to clean {}", args.input.display()))?;
    print_json(&summary)
}

fn run_train_price(args: TrainArgs) -> Result<()> {
    let config = pipeline_config(&args)?;
    let dataset = load_dataset(&args.data)?;
    let (model, report) = train_price_model(&dataset, &config)?;
    model
        .save(&args.model)
        .with_context(|| format!("failed to save model to {}", args.model.display()))?;
    tracing::info!(model = %args.model.display(), "price model saved");
    print_json(&report)
}

fn run_train_tier(args: TrainArgs) -> Result<()> {
    let config = pipeline_config(&args)?;
    let dataset = load_dataset(&args.data)?;
    let (model, report) = train_tier_model(&dataset, &config)?;
    model
        .save(&args.model)
        .with_context(|| format!("failed to save model to {}", args.model.display()))?;
    tracing::info!(model = %args.model.display(), "tier model saved");
    print_json(&report)
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let model = FittedPriceRegressor::load(&args.model)
        .with_context(|| format!("failed to load price model {}", args.model.display()))?;
    let response = serving::predict_price(&model, &features(&args))?;
    print_json(&response)
}

fn run_classify(args: PredictArgs) -> Result<()> {
    let model = FittedTierClassifier::load(&args.model)
        .with_context(|| format!("failed to load tier model {}", args.model.display()))?;
    let response = serving::classify_tier(&model, &features(&args))?;
    print_json(&response)
}

fn run_search(args: SearchArgs) -> Result<()> {
    let dataset = load_dataset(&args.data)?;
    let query = FilterQuery::new(args.max_price, args.city, args.min_area, args.min_baths)
        .with_sort_key(args.sort);
    match serving::search(&dataset, &query)? {
        FilterResponse::NoMatches => {
            println!("no matching properties");
            Ok(())
        }
        matches => print_json(&matches),
    }
}

fn run_insights(args: InsightsArgs) -> Result<()> {
    let dataset = load_dataset(&args.data)?;
    print_json(&city_insights(&dataset))
}

fn run_roi(args: RoiArgs) -> Result<()> {
    let estimate = estimate_roi(RoiInput {
        total_area: args.area,
        price_lakhs: args.price,
        rent_per_sqft: args.rent_per_sqft,
    })?;
    print_json(&estimate)
}
