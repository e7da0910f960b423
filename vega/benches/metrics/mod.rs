use chrono::{DateTime, Days, Utc};
use criterion::{BenchmarkId, Criterion, Throughput};
use smol_str::SmolStr;
use std::hint::black_box;
use vega::{
    FnvIndexMap,
    score::{CompositeScorer, batch::SymbolScorer},
    series::PriceSeries,
    statistic::{bundle::MetricsEngine, time::Frequency},
};

criterion::criterion_main!(benchmark_metrics);

fn benchmark_metrics() {
    let mut c = Criterion::default().without_plots();

    bench_compute(&mut c);
    bench_score_batch(&mut c);
}

fn bench_compute(c: &mut Criterion) {
    let engine = MetricsEngine::new(0.04, Frequency::Daily);
    let benchmark = series(2_520, 7);

    let mut group = c.benchmark_group("MetricsEngine::compute");
    for len in [252, 1_260, 2_520] {
        let asset = series(len, 11);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &asset, |b, asset| {
            b.iter(|| black_box(engine.compute(black_box(asset), Some(&benchmark))))
        });
    }
    group.finish();
}

fn bench_score_batch(c: &mut Criterion) {
    let scorer = SymbolScorer::new(
        MetricsEngine::new(0.04, Frequency::Daily),
        CompositeScorer::default(),
    );
    let universe = (0..500)
        .map(|index| (SmolStr::new(format!("SYM{index}")), series(1_260, index)))
        .collect::<FnvIndexMap<_, _>>();

    c.bench_function("SymbolScorer::score_batch/500", |b| {
        b.iter(|| black_box(scorer.score_batch(black_box(&universe), None)))
    });
}

/// Deterministic pseudo random walk.
fn series(len: usize, seed: u64) -> PriceSeries {
    let base = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap();
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut close = 100.0;

    PriceSeries::from_closes((0..len).map(|day| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let shock = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
        close *= 1.0 + shock * 0.04;
        (base + Days::new(day as u64), close)
    }))
}
