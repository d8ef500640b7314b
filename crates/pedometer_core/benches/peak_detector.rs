use criterion::{Criterion, criterion_group, criterion_main};
use pedometer_core::engine::PeakDetector;
use pedometer_core::sensor::Acceleration;
use std::hint::black_box;

fn walking_trace(len: usize) -> Vec<Acceleration> {
    // ~2 Hz gait sampled at 10 Hz around gravity.
    (0..len)
        .map(|i| {
            let phase = i as f64 * std::f64::consts::TAU / 5.0;
            Acceleration::new(0.4 * phase.cos(), 0.3, 9.81 + 3.5 * phase.sin())
        })
        .collect()
}

fn bench_peak_detector(c: &mut Criterion) {
    let trace = walking_trace(10_000);
    c.bench_function("peak_detector_10k_samples", |b| {
        b.iter(|| {
            let mut detector = PeakDetector::default();
            let steps = trace
                .iter()
                .filter(|s| detector.process(**s))
                .count();
            black_box(steps)
        })
    });
}

criterion_group!(benches, bench_peak_detector);
criterion_main!(benches);
