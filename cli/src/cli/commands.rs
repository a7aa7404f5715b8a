use clap::{Args, Subcommand};
use estate_ml::search::SortKey;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalise a raw listing export into the training table format
    Clean(CleanArgs),

    /// Train the price regressor and save it as an artifact
    TrainPrice(TrainArgs),

    /// Train the Luxury / Budget classifier and save it as an artifact
    TrainTier(TrainArgs),

    /// Predict a price in lakhs with a saved price model
    Predict(PredictArgs),

    /// Classify a property with a saved tier model
    Classify(PredictArgs),

    /// Filter listings by budget, city, area and baths
    Search(SearchArgs),

    /// Print per-city market summaries
    Insights(InsightsArgs),

    /// Estimate rental return on a purchase
    Roi(RoiArgs),
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Raw CSV export with a display `Price` column
    #[arg(long)]
    pub input: PathBuf,

    /// Destination for the cleaned CSV
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Cleaned listings CSV
    #[arg(long)]
    pub data: PathBuf,

    /// Where to write the model artifact
    #[arg(long)]
    pub model: PathBuf,

    /// TOML pipeline configuration; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the number of trees
    #[arg(long)]
    pub n_estimators: Option<usize>,

    /// Override the seed used for the split and the forest
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Model artifact produced by a train command
    #[arg(long)]
    pub model: PathBuf,

    #[arg(long)]
    pub area: f64,

    #[arg(long)]
    pub price_per_sqft: f64,

    #[arg(long, default_value_t = 1)]
    pub baths: u32,

    #[arg(long)]
    pub balcony: bool,

    #[arg(long)]
    pub city: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(long)]
    pub data: PathBuf,

    /// Budget in lakhs, inclusive
    #[arg(long)]
    pub max_price: f64,

    #[arg(long)]
    pub city: String,

    #[arg(long, default_value_t = 0.0)]
    pub min_area: f64,

    #[arg(long, default_value_t = 1)]
    pub min_baths: u32,

    /// price_asc, price_desc, area_asc or area_desc
    #[arg(long, default_value_t = SortKey::PriceAsc)]
    pub sort: SortKey,
}

#[derive(Args, Debug)]
pub struct InsightsArgs {
    #[arg(long)]
    pub data: PathBuf,
}

#[derive(Args, Debug)]
pub struct RoiArgs {
    #[arg(long)]
    pub area: f64,

    /// Purchase price in lakhs
    #[arg(long)]
    pub price: f64,

    /// Expected monthly rent per square foot in rupees
    #[arg(long, default_value_t = 25.0)]
    pub rent_per_sqft: f64,
}
