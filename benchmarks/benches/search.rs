use benchmarks::synthetic_listings;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use estate_ml::insights::city_insights;
use estate_ml::{filter, FilterQuery, SortKey};

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    for rows in [1_000, 10_000, 100_000] {
        let dataset = synthetic_listings(rows, 3);
        for sort_key in [SortKey::PriceAsc, SortKey::AreaDesc] {
            let query = FilterQuery::new(150.0, "Pune", 600.0, 2).with_sort_key(sort_key);
            group.bench_with_input(
                BenchmarkId::new(sort_key.as_str(), rows),
                &dataset,
                |b, ds| b.iter(|| black_box(filter(ds, black_box(&query)).unwrap().len())),
            );
        }
    }
    group.finish();
}

fn bench_insights(c: &mut Criterion) {
    let dataset = synthetic_listings(10_000, 3);
    c.bench_function("city_insights_10000", |b| {
        b.iter(|| black_box(city_insights(black_box(&dataset))))
    });
}

criterion_group!(benches, bench_filter, bench_insights);
criterion_main!(benches);
