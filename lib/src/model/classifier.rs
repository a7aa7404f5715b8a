//! Random-forest Luxury / Budget classifier.

use super::InferenceModel;
use crate::dataset::PropertyRecord;
use crate::error::EstateError;
use crate::labeling::{LabelPolicy, PropertyTier};
use crate::preprocessing::{
    FeatureVector, FittedPropertyTransformer, FittedTransformer, PropertyFeatures,
    PropertyTransformer, PropertyTransformerParams, Transformer,
};
use crate::serialization::{load_artifact, save_artifact, ArtifactKind};
use crate::tree::{FittedRandomForestClassifier, ForestParams, RandomForestClassifier};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unfitted tier model. Training labels are derived from each record with
/// the configured [`LabelPolicy`].
#[derive(Clone, Debug)]
pub struct TierClassifier {
    transformer: PropertyTransformer,
    forest: RandomForestClassifier,
    policy: LabelPolicy,
}

impl TierClassifier {
    pub fn new(params: ForestParams, policy: LabelPolicy) -> Self {
        Self {
            transformer: PropertyTransformer::new(),
            forest: RandomForestClassifier::new(params, PropertyTier::ALL.len()),
            policy,
        }
    }

    pub fn policy(&self) -> &LabelPolicy {
        &self.policy
    }

    pub fn fit<'a, I>(&self, records: I) -> Result<FittedTierClassifier, EstateError>
    where
        I: IntoIterator<Item = &'a PropertyRecord>,
    {
        self.policy.validate()?;
        let (rows, labels): (Vec<PropertyFeatures>, Vec<usize>) = records
            .into_iter()
            .map(|r| {
                let tier = self.policy.derive(r.price_per_sqft, r.total_area);
                (PropertyFeatures::from(r), tier.index())
            })
            .unzip();

        let luxury = labels
            .iter()
            .filter(|&&l| l == PropertyTier::Luxury.index())
            .count();
        tracing::info!(
            rows = labels.len(),
            luxury,
            budget = labels.len() - luxury,
            "derived training labels"
        );

        let (transformer, x) = self.transformer.fit_transform(&rows)?;
        let forest = self.forest.fit(x.view(), &labels)?;
        Ok(FittedTierClassifier {
            transformer,
            forest,
        })
    }
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new(ForestParams::default(), LabelPolicy::default())
    }
}

/// Serializable form of a [`FittedTierClassifier`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierClassifierParams {
    pub transformer: PropertyTransformerParams,
    pub forest: FittedRandomForestClassifier,
}

/// Fitted tier model.
#[derive(Clone, Debug)]
pub struct FittedTierClassifier {
    transformer: FittedPropertyTransformer,
    forest: FittedRandomForestClassifier,
}

impl FittedTierClassifier {
    pub fn transformer(&self) -> &FittedPropertyTransformer {
        &self.transformer
    }

    pub fn forest(&self) -> &FittedRandomForestClassifier {
        &self.forest
    }

    /// Probability of each tier, indexed by [`PropertyTier::index`].
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, EstateError> {
        self.forest.predict_proba_row(features.as_slice())
    }

    pub fn predict_records<'a, I>(&self, records: I) -> Result<Vec<PropertyTier>, EstateError>
    where
        I: IntoIterator<Item = &'a PropertyRecord>,
    {
        let rows: Vec<PropertyFeatures> = records.into_iter().map(PropertyFeatures::from).collect();
        let x = self.transformer.transform(&rows)?;
        self.forest
            .predict(x.view())?
            .into_iter()
            .map(tier_from_index)
            .collect()
    }

    pub fn extract_params(&self) -> TierClassifierParams {
        TierClassifierParams {
            transformer: self.transformer.extract_params(),
            forest: self.forest.clone(),
        }
    }

    pub fn from_params(params: TierClassifierParams) -> Result<Self, EstateError> {
        let transformer = FittedPropertyTransformer::from_params(params.transformer)?;
        params.forest.validate()?;
        if params.forest.n_classes() != PropertyTier::ALL.len() {
            return Err(EstateError::InvalidArtifact(format!(
                "classifier has {} classes, expected {}",
                params.forest.n_classes(),
                PropertyTier::ALL.len()
            )));
        }
        if params.forest.n_features() != transformer.n_features_out() {
            return Err(EstateError::InvalidArtifact(format!(
                "forest expects {} features but the transformer produces {}",
                params.forest.n_features(),
                transformer.n_features_out()
            )));
        }
        Ok(Self {
            transformer,
            forest: params.forest,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EstateError> {
        save_artifact(path, ArtifactKind::Classification, &self.extract_params())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EstateError> {
        Self::from_params(load_artifact(path, ArtifactKind::Classification)?)
    }
}

fn tier_from_index(index: usize) -> Result<PropertyTier, EstateError> {
    PropertyTier::from_index(index)
        .ok_or_else(|| EstateError::InvalidArtifact(format!("unknown class index {}", index)))
}

impl InferenceModel for FittedTierClassifier {
    type Output = PropertyTier;

    fn n_features_in(&self) -> usize {
        self.forest.n_features()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PropertyTier, EstateError> {
        tier_from_index(self.forest.predict_row(features.as_slice())?)
    }

    fn encode(&self, features: &PropertyFeatures) -> Result<FeatureVector, EstateError> {
        self.transformer.encode(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::listings;

    fn classifier() -> TierClassifier {
        TierClassifier::new(
            ForestParams::default().with_n_estimators(25),
            LabelPolicy::default(),
        )
    }

    fn fitted() -> FittedTierClassifier {
        classifier().fit(&listings()).unwrap()
    }

    fn request(city: &str, ppsf: f64, area: f64) -> PropertyFeatures {
        PropertyFeatures {
            total_area: area,
            price_per_sqft: ppsf,
            baths: 2,
            balcony: false,
            city: city.to_string(),
        }
    }

    #[test]
    fn test_classifies_clear_cases() {
        let model = fitted();
        // every Mumbai listing is above the price-per-sqft threshold
        assert_eq!(
            model.predict_features(&request("Mumbai", 17_000.0, 900.0)).unwrap(),
            PropertyTier::Luxury
        );
        assert_eq!(
            model.predict_features(&request("Pune", 6_000.0, 700.0)).unwrap(),
            PropertyTier::Budget
        );
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = fitted();
        let v = model.encode(&request("Thane", 8_200.0, 1200.0)).unwrap();
        let proba = model.predict_proba(&v).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_refit_is_identical() {
        let a = fitted();
        let b = fitted();
        let records = listings();
        assert_eq!(
            a.predict_records(&records).unwrap(),
            b.predict_records(&records).unwrap()
        );
    }

    #[test]
    fn test_independent_vocabulary_from_regressor() {
        let records = listings();
        let pune_only: Vec<_> = records.iter().filter(|r| r.city == "Pune").cloned().collect();
        let classifier = classifier().fit(&pune_only).unwrap();
        let regressor =
            crate::model::PriceRegressor::new(ForestParams::default().with_n_estimators(5))
                .fit(&records)
                .unwrap();
        assert_eq!(classifier.transformer().vocabulary().len(), 1);
        assert_eq!(regressor.transformer().vocabulary().len(), 3);
    }

    #[test]
    fn test_wrong_width_is_schema_mismatch() {
        let model = fitted();
        let long = FeatureVector::new(vec![0.0; 9]);
        assert!(matches!(
            model.predict(&long),
            Err(EstateError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tier.estm");
        let model = fitted();
        model.save(&path).unwrap();
        let loaded = FittedTierClassifier::load(&path).unwrap();
        let r = request("Thane", 9_000.0, 1000.0);
        assert_eq!(
            loaded.predict_features(&r).unwrap(),
            model.predict_features(&r).unwrap()
        );
    }

    #[test]
    fn test_load_rejects_regression_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price.estm");
        crate::model::PriceRegressor::new(ForestParams::default().with_n_estimators(3))
            .fit(&listings())
            .unwrap()
            .save(&path)
            .unwrap();
        assert!(matches!(
            FittedTierClassifier::load(&path),
            Err(EstateError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let bad = TierClassifier::new(ForestParams::default(), LabelPolicy::new(-1.0, 2000.0));
        assert!(matches!(
            bad.fit(&listings()),
            Err(EstateError::InvalidParameter(_))
        ));
    }
}
