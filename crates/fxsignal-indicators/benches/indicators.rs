//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fxsignal_core::traits::Indicator;
use fxsignal_core::types::{Bar, PriceField, PriceSeries, Timeframe};
use fxsignal_indicators::{Ema, IndicatorSet, Rsi, Sma};

fn generate_test_data(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 1.1 + (i as f64 * 0.1).sin() * 0.01)
        .collect()
}

fn generate_series(size: usize) -> PriceSeries {
    let bars = generate_test_data(size)
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as i64 * 3_600_000, c, c + 0.0005, c - 0.0005, c).with_volume(1000.0)
        })
        .collect();
    PriceSeries::new("EURUSD", Timeframe::Hour1, bars).expect("valid series")
}

fn benchmark_moving_averages(c: &mut Criterion) {
    let mut group = c.benchmark_group("MovingAverage");

    for size in [300, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("sma", size), &data, |b, data| {
            let sma = Sma::new(20).expect("valid period");
            b.iter(|| sma.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("ema", size), &data, |b, data| {
            let ema = Ema::new(20).expect("valid span");
            b.iter(|| ema.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [300, 1000, 10000].iter() {
        let data = generate_test_data(*size);

        group.bench_with_input(BenchmarkId::new("standard", size), &data, |b, data| {
            let rsi = Rsi::new(14).expect("valid period");
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_indicator_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("IndicatorSet");

    for size in [300, 1000].iter() {
        let series = generate_series(*size);

        group.bench_with_input(BenchmarkId::new("all_lines", size), &series, |b, series| {
            b.iter(|| {
                let set = IndicatorSet::new(black_box(series));
                set.atr(14).ok();
                set.rsi(14).ok();
                set.ema(PriceField::Close, 10).ok();
                set.ema(PriceField::Close, 50).ok();
                set.bollinger(20, 2.0).ok();
                set.directional(14).ok();
                set.macd(12, 26, 9).ok();
                set.rolling_max(PriceField::High, 20).ok();
                set.rolling_min(PriceField::Low, 20).ok();
                set.cached_len()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_moving_averages,
    benchmark_rsi,
    benchmark_indicator_set
);
criterion_main!(benches);
