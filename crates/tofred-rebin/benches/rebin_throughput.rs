use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tofred_core::{ReductionConfig, ValueErr};
use tofred_rebin::{build_sqe, rebin_spectrum, Kinematics, RebinStrategy, SqeOpts};
use tofred_som::{PixelGeometry, Spectrum, SpectrumId, SpectrumSet, TabulatedInstrument};

fn spectrum(pixel: u32, bins: usize, width: f64) -> Spectrum {
    let edges = (0..=bins).map(|i| i as f64 * width).collect();
    let y: Vec<f64> = (0..bins).map(|i| 100.0 + (i % 17) as f64).collect();
    Spectrum::histogram_1d(SpectrumId::new(1, pixel, 0), edges, y.clone(), y)
        .expect("bench spectrum")
}

fn bench_rebin(c: &mut Criterion) {
    let config = ReductionConfig::default();
    let input = spectrum(0, 10_000, 1.0);
    let target: Vec<f64> = (0..=3_333).map(|i| i as f64 * 3.0 + 0.5).collect();
    for strategy in [
        RebinStrategy::Exact,
        RebinStrategy::Fractional,
        RebinStrategy::LinearInterp,
    ] {
        c.bench_function(&format!("{}_10k", strategy.name()), |b| {
            b.iter(|| {
                rebin_spectrum(black_box(&input), black_box(&target), strategy, &config)
                    .expect("rebin")
            })
        });
    }
}

fn bench_sqe(c: &mut Criterion) {
    let pixels = 32;
    let set = SpectrumSet::from_spectra((0..pixels).map(|p| spectrum(p, 200, 0.1)).collect())
        .expect("bench set");
    let geometry = TabulatedInstrument::new(
        "bench",
        (0..pixels)
            .map(|p| PixelGeometry {
                id: SpectrumId::new(1, p, 0),
                primary: ValueErr::exact(20.0),
                secondary: ValueErr::exact(4.0),
                polar: ValueErr::exact(0.1 + 0.04 * p as f64),
                azimuthal: ValueErr::exact(0.0),
            })
            .collect(),
    );
    let opts = SqeOpts::new(
        Kinematics::Direct {
            incident_energy: 50.0,
        },
        (0..=200).map(|i| i as f64 * 0.04).collect(),
        (0..=100).map(|i| i as f64 * 0.2).collect(),
    );
    let config = ReductionConfig::default();
    c.bench_function("sqe_32x200", |b| {
        b.iter(|| build_sqe(black_box(&set), &geometry, &opts, &config).expect("sqe"))
    });
}

criterion_group!(benches, bench_rebin, bench_sqe);
criterion_main!(benches);
