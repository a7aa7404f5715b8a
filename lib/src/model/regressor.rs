//! Random-forest price regressor.

use super::InferenceModel;
use crate::dataset::PropertyRecord;
use crate::error::EstateError;
use crate::preprocessing::{
    FeatureVector, FittedPropertyTransformer, FittedTransformer, PropertyFeatures,
    PropertyTransformer, PropertyTransformerParams, Transformer,
};
use crate::serialization::{load_artifact, save_artifact, ArtifactKind};
use crate::tree::{FittedRandomForestRegressor, ForestParams, RandomForestRegressor};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unfitted price model: a property transformer plus forest hyperparameters.
///
/// # Example
/// ```ignore
/// use estate_ml::model::{InferenceModel, PriceRegressor};
/// use estate_ml::tree::ForestParams;
///
/// let model = PriceRegressor::new(ForestParams::default()).fit(&dataset)?;
/// let price = model.predict_features(&request)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct PriceRegressor {
    transformer: PropertyTransformer,
    forest: RandomForestRegressor,
}

impl PriceRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            transformer: PropertyTransformer::new(),
            forest: RandomForestRegressor::new(params),
        }
    }

    /// Fit the transformer and the forest on `records`, targeting
    /// `price_lakhs`.
    pub fn fit<'a, I>(&self, records: I) -> Result<FittedPriceRegressor, EstateError>
    where
        I: IntoIterator<Item = &'a PropertyRecord>,
    {
        let (rows, targets): (Vec<PropertyFeatures>, Vec<f64>) = records
            .into_iter()
            .map(|r| (PropertyFeatures::from(r), r.price_lakhs))
            .unzip();

        let (transformer, x) = self.transformer.fit_transform(&rows)?;
        let forest = self.forest.fit(x.view(), &targets)?;
        Ok(FittedPriceRegressor {
            transformer,
            forest,
        })
    }
}

/// Serializable form of a [`FittedPriceRegressor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceRegressorParams {
    pub transformer: PropertyTransformerParams,
    pub forest: FittedRandomForestRegressor,
}

/// Fitted price model. Predictions are in lakhs and are not clamped.
#[derive(Clone, Debug)]
pub struct FittedPriceRegressor {
    transformer: FittedPropertyTransformer,
    forest: FittedRandomForestRegressor,
}

impl FittedPriceRegressor {
    pub fn transformer(&self) -> &FittedPropertyTransformer {
        &self.transformer
    }

    pub fn forest(&self) -> &FittedRandomForestRegressor {
        &self.forest
    }

    /// Predict every record in order.
    pub fn predict_records<'a, I>(&self, records: I) -> Result<Vec<f64>, EstateError>
    where
        I: IntoIterator<Item = &'a PropertyRecord>,
    {
        let rows: Vec<PropertyFeatures> = records.into_iter().map(PropertyFeatures::from).collect();
        let x = self.transformer.transform(&rows)?;
        self.forest.predict(x.view())
    }

    pub fn extract_params(&self) -> PriceRegressorParams {
        PriceRegressorParams {
            transformer: self.transformer.extract_params(),
            forest: self.forest.clone(),
        }
    }

    /// Rebuild a model, checking that the transformer and the forest agree.
    pub fn from_params(params: PriceRegressorParams) -> Result<Self, EstateError> {
        let transformer = FittedPropertyTransformer::from_params(params.transformer)?;
        params.forest.validate()?;
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
        save_artifact(path, ArtifactKind::Regression, &self.extract_params())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EstateError> {
        Self::from_params(load_artifact(path, ArtifactKind::Regression)?)
    }
}

impl InferenceModel for FittedPriceRegressor {
    type Output = f64;

    fn n_features_in(&self) -> usize {
        self.forest.n_features()
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, EstateError> {
        self.forest.predict_row(features.as_slice())
    }

    fn encode(&self, features: &PropertyFeatures) -> Result<FeatureVector, EstateError> {
        self.transformer.encode(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::listings;
    use crate::serialization::{decode_artifact, encode_artifact};

    fn params() -> ForestParams {
        ForestParams::default().with_n_estimators(20)
    }

    fn fitted() -> FittedPriceRegressor {
        PriceRegressor::new(params()).fit(&listings()).unwrap()
    }

    fn request(city: &str) -> PropertyFeatures {
        PropertyFeatures {
            total_area: 1000.0,
            price_per_sqft: 8000.0,
            baths: 2,
            balcony: true,
            city: city.to_string(),
        }
    }

    #[test]
    fn test_fit_width_matches_vocabulary() {
        let model = fitted();
        assert_eq!(model.transformer().vocabulary().len(), 3);
        assert_eq!(model.n_features_in(), 3 + 4);
    }

    #[test]
    fn test_predict_is_positive_and_plausible() {
        let model = fitted();
        let price = model.predict_features(&request("Pune")).unwrap();
        assert!(price.is_finite());
        // every training target lies in [30, 450]
        assert!((30.0..=450.0).contains(&price), "price = {price}");
    }

    #[test]
    fn test_refit_is_bit_identical() {
        let a = fitted();
        let b = fitted();
        assert_eq!(a.transformer().vocabulary(), b.transformer().vocabulary());
        let r = request("Thane");
        assert_eq!(
            a.predict_features(&r).unwrap().to_bits(),
            b.predict_features(&r).unwrap().to_bits()
        );
    }

    #[test]
    fn test_unseen_city_predicts_and_counts() {
        let model = fitted();
        let price = model.predict_features(&request("Nagpur")).unwrap();
        assert!(price.is_finite());
        assert_eq!(model.transformer().unseen_category_count(), 1);
    }

    #[test]
    fn test_wrong_width_is_schema_mismatch() {
        let model = fitted();
        let short = FeatureVector::new(vec![1.0; 5]);
        assert!(matches!(
            model.predict(&short),
            Err(EstateError::SchemaMismatch {
                expected_features: 7,
                got_features: 5
            })
        ));
    }

    #[test]
    fn test_invalid_request_rejected() {
        let model = fitted();
        let mut r = request("Pune");
        r.baths = 0;
        assert!(matches!(
            model.predict_features(&r),
            Err(EstateError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_predict_records_matches_single() {
        let model = fitted();
        let records = listings();
        let batch = model.predict_records(&records[..5]).unwrap();
        for (record, expected) in records[..5].iter().zip(batch) {
            let single = model
                .predict_features(&PropertyFeatures::from(record))
                .unwrap();
            assert_eq!(single, expected);
        }
    }

    #[test]
    fn test_artifact_roundtrip_in_memory() {
        let model = fitted();
        let bytes = encode_artifact(ArtifactKind::Regression, &model.extract_params()).unwrap();
        let params: PriceRegressorParams =
            decode_artifact(ArtifactKind::Regression, &bytes).unwrap();
        let restored = FittedPriceRegressor::from_params(params).unwrap();
        let r = request("Mumbai");
        assert_eq!(
            restored.predict_features(&r).unwrap(),
            model.predict_features(&r).unwrap()
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price.estm");
        let model = fitted();
        model.save(&path).unwrap();
        let loaded = FittedPriceRegressor::load(&path).unwrap();
        assert_eq!(loaded.n_features_in(), model.n_features_in());
    }

    #[test]
    fn test_load_rejects_classifier_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tier.estm");
        crate::model::TierClassifier::new(params(), Default::default())
            .fit(&listings())
            .unwrap()
            .save(&path)
            .unwrap();
        assert!(matches!(
            FittedPriceRegressor::load(&path),
            Err(EstateError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_width_disagreement() {
        let mut params = fitted().extract_params();
        // drop one city: transformer width no longer matches the forest
        let mut cities = params.transformer.city_encoder.vocabulary.categories().to_vec();
        cities.pop();
        params.transformer.city_encoder.vocabulary =
            crate::preprocessing::CategoryVocabulary::from_sorted(cities).unwrap();
        params.transformer.n_features_out -= 1;
        assert!(matches!(
            FittedPriceRegressor::from_params(params),
            Err(EstateError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_fit_empty_is_error() {
        let empty: Vec<PropertyRecord> = Vec::new();
        assert!(matches!(
            PriceRegressor::new(params()).fit(&empty),
            Err(EstateError::EmptyData(_))
        ));
    }

    #[test]
    fn test_fitted_model_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FittedPriceRegressor>();
    }
}
