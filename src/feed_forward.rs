//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! Train a small network towards a single target:
//!
//! ```
//! use backprop::builder::NetworkBuilder;
//! use backprop::error_metric::ErrorMetric;
//!
//! let mut network = NetworkBuilder::new(2, &[3, 1])
//!     .unwrap()
//!     .seed(3)
//!     .build();
//! let metric = ErrorMetric::HalfSquaredDifference;
//!
//! let before = network.error(&[0.0, 1.0], &[1.0], metric);
//! for _ in 0..10 {
//!     network.train(&[0.0, 1.0], &[1.0], metric, 0.5);
//! }
//! let after = network.error(&[0.0, 1.0], &[1.0], metric);
//! assert!(after < before);
//! ```

use crate::activator::Activator;
use crate::error_metric::ErrorMetric;
use crate::layer::CalculationLayer;

use rand::Rng;
use tracing::trace;

/// A Feedforward neural network.
///
/// The network caches every layer's latest output, so `apply` and
/// `backpropagate` take `&mut self` and one instance cannot be shared
/// between concurrent training steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layers: Vec<CalculationLayer>,
}

impl Network {
    /// Creates a network with zeroed parameters.
    ///
    /// Arguments:
    ///  * `inputs` - the width of the network input.
    ///  * `layer_sizes` - the number of neurons in each calculation layer.
    ///  * `activator` - the activation function to use for each layer.
    ///
    /// Callers are expected to have validated the sizes; see
    /// `NetworkBuilder` for the checked constructor.
    pub(crate) fn new(
        inputs: usize,
        layer_sizes: &[usize],
        activator: Activator,
    ) -> Self {
        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut fan_in = inputs;
        for &fan_out in layer_sizes {
            layers.push(CalculationLayer::new(fan_in, fan_out, activator));
            fan_in = fan_out;
        }
        Network { layers }
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.first().input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.last().output_len()
    }

    /// Returns the number of calculation layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, layer: usize) -> &CalculationLayer {
        &self.layers[layer]
    }

    /// Returns each layer's weight shape as `(inputs, outputs)`.
    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.layers.iter().map(CalculationLayer::shape).collect()
    }

    pub fn weight(&self, layer: usize, input: usize, output: usize) -> f64 {
        self.layers[layer].weight(input, output)
    }

    pub fn set_weight(
        &mut self,
        layer: usize,
        input: usize,
        output: usize,
        weight: f64,
    ) {
        self.layers[layer].set_weight(input, output, weight);
    }

    pub fn bias(&self, layer: usize, output: usize) -> f64 {
        self.layers[layer].bias(output)
    }

    pub fn set_bias(&mut self, layer: usize, output: usize, bias: f64) {
        self.layers[layer].set_bias(output, bias);
    }

    pub fn set_activator(&mut self, layer: usize, activator: Activator) {
        self.layers[layer].set_activator(activator);
    }

    /// The cached output of `layer` from the latest `apply`.
    pub fn output(&self, layer: usize) -> &[f64] {
        self.layers[layer].output()
    }

    /// Reinitializes every layer's parameters.
    pub fn randomise(&mut self) {
        self.randomise_with(&mut rand::thread_rng());
    }

    pub fn randomise_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for layer in &mut self.layers {
            layer.randomise_with(&mut *rng);
        }
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    ///
    /// The returned slice is the last layer's cache and is overwritten by
    /// the next call.
    pub fn apply(&mut self, input: &[f64]) -> &[f64] {
        assert_eq!(input.len(), self.input_len());
        for i in 0..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(i);
            let current = before.last().map_or(input, |l| l.output());
            after[0].apply(current);
        }
        self.last().output()
    }

    /// Feeds `downstream`, the error gradient at the network output, back
    /// through every layer and updates their parameters by
    /// `learning_rate * input * delta`.
    ///
    /// `input` must be the input of the `apply` call that immediately
    /// preceded this one, since each layer reads its cached output.
    pub fn backpropagate(
        &mut self,
        input: &[f64],
        downstream: &[f64],
        learning_rate: f64,
    ) {
        assert_eq!(input.len(), self.input_len());
        assert_eq!(downstream.len(), self.output_len());
        let mut gradient = downstream.to_vec();
        for k in (0..self.layers.len()).rev() {
            let (before, after) = self.layers.split_at_mut(k);
            let layer = &mut after[0];
            match before.last() {
                Some(previous) => {
                    let mut upstream = vec![0.0; layer.input_len()];
                    layer.adjust(
                        previous.output(),
                        &mut gradient,
                        learning_rate,
                        Some(&mut upstream[..]),
                    );
                    gradient = upstream;
                }
                None => layer.adjust(input, &mut gradient, learning_rate, None),
            }
        }
    }

    /// Runs one gradient descent step on a single example.
    ///
    /// Returns the error measured by `metric` before the update. A `target`
    /// shorter or longer than the output is compared over the common prefix
    /// only; unmatched outputs receive no gradient.
    pub fn train(
        &mut self,
        input: &[f64],
        target: &[f64],
        metric: ErrorMetric,
        learning_rate: f64,
    ) -> f64 {
        let mut gradient = vec![0.0; self.output_len()];
        let output = self.apply(input);
        let error = metric.total(target, output);
        metric.gradient_into(target, output, &mut gradient);
        trace!(loss = error, "training step");
        self.backpropagate(input, &gradient, -learning_rate);
        error
    }

    /// Evaluates `metric` on the output for `input`.
    pub fn error(
        &mut self,
        input: &[f64],
        target: &[f64],
        metric: ErrorMetric,
    ) -> f64 {
        metric.total(target, self.apply(input))
    }

    fn first(&self) -> &CalculationLayer {
        &self.layers[0]
    }

    fn last(&self) -> &CalculationLayer {
        &self.layers[self.layers.len() - 1]
    }
}
