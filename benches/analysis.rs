use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shanten_improve::{AnalysisConfig, Analyzer, BatchAnalyzer, HandRequest, StandardOracle};

#[path = "../tests/common/mod.rs"]
mod common;

use common::hand;

fn iishanten13() -> shanten_improve::Tiles34 {
    hand("2356m456p789s111z")
}

fn iishanten14() -> shanten_improve::Tiles34 {
    hand("2356m456p789s1112z")
}

fn bench_analyze13(c: &mut Criterion) {
    let tiles = iishanten13();
    c.bench_function("analyze13_plain_oracle", |b| {
        let analyzer = Analyzer::new(StandardOracle, AnalysisConfig::default());
        b.iter(|| analyzer.analyze13(black_box(&tiles), false).unwrap());
    });
    c.bench_function("analyze13_memoized", |b| {
        b.iter(|| {
            Analyzer::standard(AnalysisConfig::default())
                .analyze13(black_box(&tiles), false)
                .unwrap()
        });
    });
}

fn bench_analyze14(c: &mut Criterion) {
    let tiles = iishanten14();
    c.bench_function("analyze14_memoized", |b| {
        b.iter(|| {
            Analyzer::standard(AnalysisConfig::default())
                .analyze14(black_box(&tiles), false)
                .unwrap()
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let requests = vec![
        HandRequest {
            tiles: iishanten14(),
            is_open: false,
        };
        16
    ];
    let batch = BatchAnalyzer::new(AnalysisConfig::default()).unwrap();
    c.bench_function("analyze14_batch_16", |b| {
        b.iter(|| batch.analyze14_batch(black_box(&requests)));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_analyze13, bench_analyze14, bench_batch
}
criterion_main!(benches);
