use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shelfcast::prelude::*;
use shelfcast_datasets::generate;
use shelfcast_ensemble::RandomForestRegressor;
use shelfcast_preprocessing::{CalendarFeatures, FeatureSelection};

fn random_forest_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    // days of sales history per training set
    let training_set_sizes = &[100, 365, 1000];

    let hyperparams = RandomForestRegressor::params().n_trees(200).seed(42);

    let mut group = c.benchmark_group("random_forest");
    group.sample_size(10);

    for n in training_set_sizes.iter() {
        let frame = generate::sales(*n, start, &mut rng).unwrap();
        let frame = CalendarFeatures::new().transform(&frame).unwrap();
        let dataset = FeatureSelection::retail().select(&frame).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

criterion_group!(benches, random_forest_bench);
criterion_main!(benches);
