//! Benchmarks for the analysis pipeline.

use candlecoach::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Generate realistic random candles
fn generate_candles(n: usize) -> Vec<Candle> {
  let mut candles = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    let volatility = 2.0 + ((i * 3) % 10) as f64 / 5.0;

    let o = price;
    let c = price + change;
    let h = o.max(c) + volatility * 0.5;
    let l = o.min(c) - volatility * 0.5;

    candles.push(Candle::new(i as i64 * 60, o, h, l, c));
    price = c;
  }

  candles
}

fn bench_full_analysis(c: &mut Criterion) {
  let candles = generate_candles(1000);
  let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();

  c.bench_function("analyze_1000_candles", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze(black_box(&candles)));
    })
  });
}

fn bench_clustered_levels(c: &mut Criterion) {
  let candles = generate_candles(1000);
  let config =
    AnalysisConfig { snr_strategy: SnrStrategy::Clustered, ..AnalysisConfig::default() };
  let analyzer = Analyzer::new(config).unwrap();

  c.bench_function("analyze_1000_candles_clustered", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze(black_box(&candles)));
    })
  });
}

fn bench_indicators(c: &mut Criterion) {
  let candles = generate_candles(1000);
  let config = AnalysisConfig::default();

  c.bench_function("indicators_1000_candles", |b| {
    b.iter(|| {
      let _ = black_box(IndicatorSnapshot::compute(black_box(&candles), black_box(&config)));
    })
  });
}

fn bench_structure(c: &mut Criterion) {
  let candles = generate_candles(1000);

  c.bench_function("structure_1000_candles", |b| {
    b.iter(|| {
      let _ = black_box(MarketStructure::detect(black_box(&candles), black_box(2)));
    })
  });
}

fn bench_scaling(c: &mut Criterion) {
  let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();

  let mut group = c.benchmark_group("scaling");

  for size in [100, 500, 1000, 5000, 10000].iter() {
    let candles = generate_candles(*size);

    group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(analyzer.analyze(black_box(&candles)));
      })
    });
  }

  group.finish();
}

fn bench_parallel_analysis(c: &mut Criterion) {
  let candles1 = generate_candles(1000);
  let candles2 = generate_candles(1000);
  let candles3 = generate_candles(1000);
  let candles4 = generate_candles(1000);

  let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();

  let instruments: Vec<(&str, &[Candle])> = vec![
    ("EURUSD", &candles1),
    ("GBPUSD", &candles2),
    ("USDJPY", &candles3),
    ("XAUUSD", &candles4),
  ];

  c.bench_function("parallel_analyze_4_instruments", |b| {
    b.iter(|| {
      let _ = black_box(analyze_parallel(black_box(&analyzer), black_box(instruments.clone())));
    })
  });
}

criterion_group!(
  benches,
  bench_full_analysis,
  bench_clustered_levels,
  bench_indicators,
  bench_structure,
  bench_scaling,
  bench_parallel_analysis,
);

criterion_main!(benches);
