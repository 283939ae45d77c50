//! Utilities for training neural networks.

use crate::error::NetworkError;
use crate::error_metric::ErrorMetric;
use crate::feed_forward::Network;

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A builder for training networks with stochastic gradient descent.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    metric: ErrorMetric,
    learning_rate: f64,
    logging: Logging,
    stop_condition: StopCondition,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Half squared difference as the error metric.
    /// * A learning rate of 0.1.
    /// * Stops after 1000 training iterations.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            metric: ErrorMetric::default(),
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
        }
    }

    /// Sets the error metric whose derivative seeds backpropagation.
    pub fn metric(mut self, metric: ErrorMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`. Every
    /// example is applied as its own training step.
    ///
    /// Returns:
    ///   The trained network, or an error if the examples do not fit it.
    pub fn train<I, O>(
        mut self,
        examples: &[(I, O)],
    ) -> Result<Network, NetworkError>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut iteration = 0;
        let mut training_error;
        loop {
            training_error = 0.0;
            for (input, expected) in examples {
                training_error += self.network.train(
                    input.as_ref(),
                    expected.as_ref(),
                    self.metric,
                    self.learning_rate,
                );
            }
            training_error /= examples.len() as f64;
            iteration += 1;

            self.logging.iteration(iteration, training_error);
            if self.stop_condition.should_stop(
                iteration,
                training_error,
                start_time,
            ) {
                break;
            }
        }
        self.logging
            .completion(iteration, training_error, start_time);
        Ok(self.network)
    }

    /// Verifies that the examples fit the network, returning an error if
    /// something is wrong.
    fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<(), NetworkError>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if examples.is_empty() {
            return Err(NetworkError::NoExamples);
        }
        for (input, output) in examples {
            check_len(self.network.input_len(), input.as_ref().len())?;
            check_len(self.network.output_len(), output.as_ref().len())?;
        }
        Ok(())
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), NetworkError> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::ShapeMismatch { expected, actual })
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// A summary will be emitted after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                debug!(
                    iteration = iteration,
                    error = training_error,
                    "training progress"
                );
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(
        &self,
        iterations: usize,
        training_error: f64,
        start_time: Instant,
    ) {
        if let Logging::Silent = self {
            return;
        }
        info!(
            iterations = iterations,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            error = training_error,
            "training complete"
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of training iterations
    Iterations(usize),
    /// Stops when the mean training error drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true of training is complete.
    fn should_stop(
        &self,
        iteration: usize,
        training_error: f64,
        start_time: Instant,
    ) -> bool {
        use self::StopCondition::*;
        match *self {
            Iterations(iterations) => iteration >= iterations,
            ErrorThreshold(threshold) => training_error < threshold,
            Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
