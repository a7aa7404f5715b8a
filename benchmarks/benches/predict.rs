use benchmarks::synthetic_listings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use estate_ml::model::{InferenceModel, PriceRegressor, TierClassifier};
use estate_ml::preprocessing::{FeatureVector, PropertyFeatures};
use estate_ml::tree::ForestParams;
use estate_ml::LabelPolicy;

fn request() -> PropertyFeatures {
    PropertyFeatures {
        total_area: 1_050.0,
        price_per_sqft: 17_500.0,
        baths: 2,
        balcony: true,
        city: "Mumbai".to_string(),
    }
}

fn bench_fit_regressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_price_regressor");
    group.sample_size(10);
    for rows in [500, 2_000] {
        let dataset = synthetic_listings(rows, 7);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, ds| {
            let regressor = PriceRegressor::new(ForestParams::default().with_n_estimators(50));
            b.iter(|| black_box(regressor.fit(black_box(ds)).unwrap()));
        });
    }
    group.finish();
}

fn bench_predict_single(c: &mut Criterion) {
    let dataset = synthetic_listings(2_000, 7);
    let price = PriceRegressor::new(ForestParams::default()).fit(&dataset).unwrap();
    let tier = TierClassifier::new(ForestParams::default(), LabelPolicy::default())
        .fit(&dataset)
        .unwrap();
    let request = request();

    c.bench_function("predict_price_single", |b| {
        b.iter(|| black_box(price.predict_features(black_box(&request)).unwrap()))
    });
    c.bench_function("classify_tier_single", |b| {
        b.iter(|| black_box(tier.predict_features(black_box(&request)).unwrap()))
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let dataset = synthetic_listings(2_000, 7);
    let price = PriceRegressor::new(ForestParams::default()).fit(&dataset).unwrap();
    let vectors: Vec<FeatureVector> = synthetic_listings(1_000, 11)
        .iter()
        .map(|r| price.encode(&PropertyFeatures::from(r)))
        .collect::<Result<_, _>>()
        .unwrap();

    c.bench_function("encode_price_single", |b| {
        b.iter(|| black_box(price.encode(black_box(&request())).unwrap()))
    });
    c.bench_function("predict_price_batch_1000", |b| {
        b.iter(|| black_box(price.predict_batch(black_box(&vectors)).unwrap()))
    });
}

criterion_group!(benches, bench_fit_regressor, bench_predict_single, bench_predict_batch);
criterion_main!(benches);
