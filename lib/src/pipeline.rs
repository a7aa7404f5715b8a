//! End-to-end training: split, fit on the train rows, score on the rest.

use crate::config::PipelineConfig;
use crate::dataset::{stratified_split, train_test_split, PropertyDataset};
use crate::error::EstateError;
use crate::labeling::PropertyTier;
use crate::metrics::{ClassificationMetrics, Metrics, RegressionMetrics};
use crate::model::{FittedPriceRegressor, FittedTierClassifier, PriceRegressor, TierClassifier};
use serde::Serialize;
use std::fmt;

/// Held-out evaluation of a freshly trained model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EvaluationReport<M> {
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: M,
}

impl fmt::Display for EvaluationReport<RegressionMetrics> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train={} test={} MAE={:.3} RMSE={:.3} R2={:.4}",
            self.train_rows,
            self.test_rows,
            self.metrics.mae,
            self.metrics.rmse,
            self.metrics.r_squared
        )
    }
}

impl fmt::Display for EvaluationReport<ClassificationMetrics> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train={} test={} accuracy={:.4}",
            self.train_rows, self.test_rows, self.metrics.accuracy
        )
    }
}

/// Train the price regressor on a seeded hold-out split.
pub fn train_price_model(
    dataset: &PropertyDataset,
    config: &PipelineConfig,
) -> Result<(FittedPriceRegressor, EvaluationReport<RegressionMetrics>), EstateError> {
    config.validate()?;
    let (train_idx, test_idx) =
        train_test_split(dataset.len(), config.split.test_size, config.split.random_state)?;
    let train = dataset.subset(&train_idx);
    let test = dataset.subset(&test_idx);

    let model = PriceRegressor::new(config.forest).fit(&train)?;

    let y_true: Vec<f64> = test.iter().map(|r| r.price_lakhs).collect();
    let y_pred = model.predict_records(&test)?;
    let report = EvaluationReport {
        train_rows: train.len(),
        test_rows: test.len(),
        metrics: Metrics::calculate_all(&y_true, &y_pred)?,
    };
    tracing::info!(%report, "price model evaluated");
    Ok((model, report))
}

/// Train the tier classifier on a split stratified by derived label.
pub fn train_tier_model(
    dataset: &PropertyDataset,
    config: &PipelineConfig,
) -> Result<(FittedTierClassifier, EvaluationReport<ClassificationMetrics>), EstateError> {
    config.validate()?;
    let labels: Vec<PropertyTier> = dataset
        .iter()
        .map(|r| config.labels.derive(r.price_per_sqft, r.total_area))
        .collect();
    let indices: Vec<usize> = labels.iter().map(|t| t.index()).collect();
    let (train_idx, test_idx) =
        stratified_split(&indices, config.split.test_size, config.split.random_state)?;
    let train = dataset.subset(&train_idx);
    let test = dataset.subset(&test_idx);

    let model = TierClassifier::new(config.forest, config.labels).fit(&train)?;

    let y_true: Vec<PropertyTier> = test_idx.iter().map(|&i| labels[i]).collect();
    let y_pred = model.predict_records(&test)?;
    let report = EvaluationReport {
        train_rows: train.len(),
        test_rows: test.len(),
        metrics: ClassificationMetrics {
            accuracy: Metrics::accuracy(&y_true, &y_pred)?,
        },
    };
    tracing::info!(%report, "tier model evaluated");
    Ok((model, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::listings;
    use crate::model::InferenceModel;
    use crate::tree::ForestParams;

    fn config() -> PipelineConfig {
        PipelineConfig {
            forest: ForestParams::default().with_n_estimators(20),
            ..PipelineConfig::default()
        }
    }

    fn dataset() -> PropertyDataset {
        PropertyDataset::from_records(listings())
    }

    #[test]
    fn test_train_price_model_report() {
        let (model, report) = train_price_model(&dataset(), &config()).unwrap();
        assert_eq!(report.test_rows, 12);
        assert_eq!(report.train_rows, 48);
        assert!(report.metrics.r_squared > 0.5, "{report}");
        assert_eq!(model.n_features_in(), model.transformer().vocabulary().len() + 4);
    }

    #[test]
    fn test_train_tier_model_report() {
        let (_, report) = train_tier_model(&dataset(), &config()).unwrap();
        assert_eq!(report.train_rows + report.test_rows, 60);
        assert!(report.metrics.accuracy >= 0.75, "{report}");
    }

    #[test]
    fn test_training_is_reproducible() {
        let (_, a) = train_price_model(&dataset(), &config()).unwrap();
        let (_, b) = train_price_model(&dataset(), &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.split.test_size = 0.0;
        assert!(matches!(
            train_price_model(&dataset(), &bad),
            Err(EstateError::Config(_))
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let one = PropertyDataset::from_records(listings().into_iter().take(1).collect());
        assert!(matches!(
            train_price_model(&one, &config()),
            Err(EstateError::EmptyData(_))
        ));
    }

    #[test]
    fn test_report_display() {
        let report = EvaluationReport {
            train_rows: 8,
            test_rows: 2,
            metrics: ClassificationMetrics { accuracy: 0.5 },
        };
        assert_eq!(report.to_string(), "train=8 test=2 accuracy=0.5000");
    }
}
