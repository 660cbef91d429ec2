use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use recuit::{
    batch,
    solver::{ThresholdAccepting, ThresholdRule},
    Domain, FnModel, ForwardModel, Minimiser, Pixel, Precision,
};

fn volume() -> Vec<Box<dyn ForwardModel>> {
    vec![
        FnModel::boxed(3, |x: &[f64]| x[0] + 0.5 * x[1] + 0.25 * x[2]),
        FnModel::boxed(3, |x: &[f64]| x[0] * x[1]),
        FnModel::boxed(3, |x: &[f64]| x[1] * (-x[2]).exp()),
        FnModel::boxed(3, |x: &[f64]| x[0] - x[2] * x[2]),
    ]
}

fn volume_domain() -> Domain {
    Domain::from_triples([(0.0, 5.0, 1e-4); 3]).unwrap()
}

fn volume_data(x: [f64; 3]) -> Vec<f64> {
    volume().iter().map(|m| m.eval(&x)).collect()
}

fn single_pixel(c: &mut Criterion) {
    let data = volume_data([2.0, 1.0, 0.5]);
    let x0 = [1.0, 1.0, 1.0];

    let annealing = Minimiser::new(volume(), volume_domain()).unwrap();
    c.bench_function("simulated annealing volume", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| annealing.minimise(&data, &x0, &mut rng))
    });

    let threshold = Minimiser::builder(volume(), volume_domain())
        .with_acceptance(ThresholdAccepting::with_rule(ThresholdRule::EnergyIncrease))
        .build()
        .unwrap();
    c.bench_function("threshold accepting volume", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| threshold.minimise(&data, &x0, &mut rng))
    });

    let prior = Minimiser::builder(volume(), volume_domain())
        .with_precision(Precision::diagonal(&[0.1; 3], &[1.0; 4]))
        .build()
        .unwrap();
    let xap = [1.8, 1.1, 0.6];
    c.bench_function("simulated annealing volume with prior", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| prior.minimise_with_prior(&data, &x0, &xap, &mut rng))
    });
}

fn image(c: &mut Criterion) {
    let minimiser = Minimiser::new(volume(), volume_domain()).unwrap();

    let data = (0..64)
        .map(|i| {
            let t = i as f64 / 64.0;
            volume_data([1.0 + 2.0 * t, 0.5 + t, 1.0 - 0.5 * t])
        })
        .collect::<Vec<_>>();
    let x0 = [1.0, 1.0, 1.0];
    let pixels = data
        .iter()
        .map(|d| Pixel::new(d, &x0))
        .collect::<Vec<_>>();

    c.bench_function("batch of 64 pixels", |b| {
        b.iter(|| batch::minimise_pixels(&minimiser, &pixels, 1))
    });
}

criterion_group!(benches, single_pixel, image);
criterion_main!(benches);
