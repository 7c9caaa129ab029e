use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grievance_pipeline::generators::{DatasetSizes, SyntheticGenerator};
use grievance_pipeline::models::Dataset;
use grievance_pipeline::processors::{Cleaner, IntegrityChecker};
use grievance_pipeline::settings::default_start_date;
use grievance_pipeline::store::{SchemaVariant, SqliteStore};

fn generate(sizes: DatasetSizes) -> Dataset {
    SyntheticGenerator::new(sizes, default_start_date(), SchemaVariant::Extended)
        .with_seed(42)
        .generate()
        .unwrap()
}

fn benchmark_generation(c: &mut Criterion) {
    c.bench_function("generate_default_dataset", |b| {
        b.iter(|| generate(black_box(DatasetSizes::default())))
    });
}

fn benchmark_load_and_clean(c: &mut Criterion) {
    let dataset = generate(DatasetSizes::default());
    let cleaner = Cleaner::new(SchemaVariant::Extended);

    c.bench_function("load_and_clean", |b| {
        b.iter(|| {
            let mut store = SqliteStore::open_in_memory(SchemaVariant::Extended).unwrap();
            store.load_dataset(black_box(&dataset)).unwrap();
            cleaner.clean(&store).unwrap()
        })
    });
}

fn benchmark_integrity_by_size(c: &mut Criterion) {
    let checker = IntegrityChecker::new();
    let mut group = c.benchmark_group("integrity_check_by_size");

    for grievances in [1_000, 5_000, 20_000] {
        let sizes = DatasetSizes {
            grievances,
            ..DatasetSizes::default()
        };
        let dataset = generate(sizes);
        group.bench_with_input(
            BenchmarkId::new("grievances", grievances),
            &dataset,
            |b, dataset| b.iter(|| checker.check_dataset(black_box(dataset))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_generation,
    benchmark_load_and_clean,
    benchmark_integrity_by_size
);
criterion_main!(benches);
