//! Benchmarks for the per-frame conditioning and estimation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pulse_cam::{SignalBuffer, SignalConditioner, SpectralEstimator};

fn full_buffer() -> SignalBuffer {
    let mut buffer = SignalBuffer::new(250, 25.0);
    for i in 0..250 {
        let t = i as f64 / 30.0;
        let v = 128.0 + 5.0 * (2.0 * std::f64::consts::PI * 1.2 * t).sin();
        buffer.append(t, v).unwrap();
    }
    buffer
}

fn bench_pipeline(c: &mut Criterion) {
    let buffer = full_buffer();
    let conditioner = SignalConditioner::new(32);

    c.bench_function("condition_250_samples", |b| {
        b.iter(|| conditioner.condition(black_box(&buffer)))
    });

    let series = conditioner.condition(&buffer).unwrap();
    c.bench_function("estimate_250_samples", |b| {
        let mut estimator = SpectralEstimator::new(50.0, 160.0, 0.6);
        b.iter(|| estimator.estimate(black_box(&series)))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
