use rand::{rngs::SmallRng, SeedableRng};
use recuit::{Domain, ForwardModel, Minimiser, Outcome, Pixel};

// Single layer of vegetation over bare soil, seen by two radar channels.
struct Channel {
    vegetation: f64,
    soil: f64,
    extinction: f64,
}

impl ForwardModel for Channel {
    // Biomass and soil moisture.
    fn num_vars(&self) -> usize {
        2
    }

    fn eval(&self, x: &[f64]) -> f64 {
        let transmissivity = (-self.extinction * x[0]).exp();
        self.vegetation * x[0] * (1.0 - transmissivity) + self.soil * x[1] * transmissivity
    }
}

fn main() -> Result<(), String> {
    let models: Vec<Box<dyn ForwardModel>> = vec![
        Box::new(Channel {
            vegetation: 0.3,
            soil: 1.2,
            extinction: 0.5,
        }),
        Box::new(Channel {
            vegetation: 0.8,
            soil: 0.4,
            extinction: 1.5,
        }),
    ];

    let truth = [1.2, 0.35];
    let data = models.iter().map(|m| m.eval(&truth)).collect::<Vec<_>>();

    let dom = Domain::from_triples([(0.0, 4.0, 1e-4), (0.05, 0.5, 1e-5)])
        .map_err(|error| format!("{error}"))?;
    let minimiser = Minimiser::new(models, dom).map_err(|error| format!("{error}"))?;

    let mut rng = SmallRng::seed_from_u64(42);
    let outcome = minimiser.minimise_inspect(&Pixel::new(&data, &[2.0, 0.2]), &mut rng, |state| {
        if state.epoch() % 25 == 0 {
            println!(
                "epoch = {}\tcontrol = {:.3e}\tenergy = {:.3e}\tbest = {:.3e}\tx = {:?}",
                state.epoch(),
                state.control(),
                state.energy(),
                state.best_energy(),
                state.best_x()
            );
        }
    });

    let solution = outcome.solution();
    println!(
        "x = {:?} (truth {:?}), error = {:.3e}, evaluations = {}",
        solution.x(),
        truth,
        solution.error(),
        solution.evaluations()
    );

    match outcome {
        Outcome::Converged(_) | Outcome::Completed(_) => Ok(()),
        _ => Err("did not converge".to_string()),
    }
}
