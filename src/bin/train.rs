use backprop::trainer::{Logging, StopCondition, Trainer};
use backprop::{Activator, Network, NetworkBuilder};

use rand_distr::{Distribution, Normal, NormalError, Uniform};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

type Input = [f64; 2];
type Output = [f64; 2];

fn generate_data(
    num_samples: usize,
) -> Result<Vec<(Input, Output)>, NormalError> {
    let mut rng = rand::thread_rng();
    let radians = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    let noise = Normal::new(0.0, 0.1)?;

    let mut data = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let theta = radians.sample(&mut rng);
        let dx = noise.sample(&mut rng);
        let dy = noise.sample(&mut rng);
        let point = [theta.cos() + dx, theta.sin() + dy];
        let class = if point[0] * point[1] > 0.0 {
            [1.0, 0.0]
        } else {
            [0.0, 1.0]
        };
        data.push((point, class));
    }
    Ok(data)
}

fn score(set_name: &str, network: &mut Network, test_data: &[(Input, Output)]) {
    let mut num_correct = 0;
    for (input, expected) in test_data {
        let output = network.apply(input);
        let class = if output[0] > output[1] { 0 } else { 1 };
        if expected[class] == 1.0 {
            num_correct += 1;
        }
    }
    info!(
        set = set_name,
        correct = num_correct,
        total = test_data.len(),
        "evaluation"
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let network = NetworkBuilder::new(2, &[5, 5, 2])?
        .activators(Activator::Sigmoid)
        .randomise(true)
        .build();

    let training_data = generate_data(10_000)?;
    let mut network = Trainer::new(network)
        .learning_rate(0.1)
        .stop_condition(StopCondition::Iterations(50))
        .logging(Logging::Iterations(5))
        .train(&training_data)?;

    score("training", &mut network, &training_data);
    score("test", &mut network, &generate_data(1_000)?);
    Ok(())
}
