use rand::{rngs::SmallRng, Rng, SeedableRng};
use recuit::{Acceptance, Domain, FnModel, Minimiser};

// Tsallis acceptance with the Boltzmann criterion as the limit q -> 1.
struct Tsallis {
    q: f64,
}

impl Acceptance for Tsallis {
    const NAME: &'static str = "Tsallis";

    fn accept<R: Rng + ?Sized>(&self, new: f64, current: f64, control: f64, rng: &mut R) -> bool {
        if control <= 0.0 {
            return false;
        }

        let base = 1.0 - (1.0 - self.q) * (new - current) / control;
        let p = if base > 0.0 {
            base.powf(1.0 / (1.0 - self.q))
        } else {
            0.0
        };

        rng.gen::<f64>() < p
    }
}

fn main() -> Result<(), String> {
    let models = vec![
        FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
        FnModel::boxed(2, |x: &[f64]| x[0] * x[1]),
        FnModel::boxed(2, |x: &[f64]| x[0] - 2.0 * x[1]),
    ];
    let dom = Domain::from_triples([(0.0, 5.0, 1e-4), (0.0, 5.0, 1e-4)])
        .map_err(|error| format!("{error}"))?;

    let minimiser = Minimiser::builder(models, dom)
        .with_acceptance(Tsallis { q: 0.5 })
        .build()
        .map_err(|error| format!("{error}"))?;

    let mut rng = SmallRng::seed_from_u64(7);
    let outcome = minimiser.minimise(&[2.0, 0.75, 0.5], &[4.0, 4.0], &mut rng);

    println!(
        "{}: x = {:?}, error = {:.3e}, restarts = {}",
        minimiser.name(),
        outcome.x(),
        outcome.error(),
        outcome.solution().restarts()
    );

    if outcome.is_success() {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
