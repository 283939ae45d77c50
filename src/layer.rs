use crate::activator::Activator;
use crate::matrix::Mat;

use rand::Rng;
use rand_distr::StandardNormal;

/// A single fully connected layer of the neural network.
///
/// Weights are stored as a `fan-in x fan-out` matrix, so each neuron's
/// weights form a column. The layer also owns the output of its most recent
/// `apply`, which `adjust` reads back during backpropagation.
///
/// Two layers are equal when their activator and parameters match; the
/// cached output is not compared.
#[derive(Clone, Debug)]
pub struct CalculationLayer {
    /// The activation function to be used for every neuron in the layer.
    activator: Activator,
    weights: Mat,
    bias: Vec<f64>,
    /// Activated output of the last `apply` call.
    output: Vec<f64>,
}

impl PartialEq for CalculationLayer {
    fn eq(&self, other: &Self) -> bool {
        self.activator == other.activator
            && self.weights == other.weights
            && self.bias == other.bias
    }
}

impl CalculationLayer {
    /// Initializes a new layer with all weights and biases set to zero.
    ///
    /// Arguments:
    ///
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    ///  * `activator` - the activation function to be used for this layer's
    ///                  output.
    pub fn new(inputs: usize, outputs: usize, activator: Activator) -> Self {
        CalculationLayer {
            activator,
            weights: Mat::zeros(inputs, outputs),
            bias: vec![0.0; outputs],
            output: vec![0.0; outputs],
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.rows()
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.weights.cols()
    }

    /// Returns the weight matrix shape as `(inputs, outputs)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.input_len(), self.output_len())
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    pub fn set_activator(&mut self, activator: Activator) {
        self.activator = activator;
    }

    pub fn weight(&self, input: usize, output: usize) -> f64 {
        self.weights.get(input, output)
    }

    pub fn set_weight(&mut self, input: usize, output: usize, weight: f64) {
        self.weights.set(input, output, weight);
    }

    pub fn bias(&self, output: usize) -> f64 {
        self.bias[output]
    }

    pub fn set_bias(&mut self, output: usize, bias: f64) {
        self.bias[output] = bias;
    }

    /// The activated output of the most recent `apply`.
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Feeds the provided `input` forward through the layer.
    ///
    /// The result is cached in the layer and the returned slice borrows that
    /// cache, so it is overwritten by the next call.
    pub fn apply(&mut self, input: &[f64]) -> &[f64] {
        assert_eq!(input.len(), self.input_len());
        self.weights.premultiply_into(input, &mut self.output);
        for (y, b) in self.output.iter_mut().zip(&self.bias) {
            *y += b;
        }
        let transform = self.activator.materialize(&self.output);
        for y in self.output.iter_mut() {
            *y = transform.apply(*y);
        }
        &self.output
    }

    /// Performs one backpropagation step through this layer.
    ///
    /// `downstream` holds the error gradient with respect to this layer's
    /// output and is turned into the gradient with respect to its
    /// pre-activation in place. If `upstream` is given, it receives the
    /// gradient with respect to `layer_input`, computed from the weights as
    /// they were before this step's update. The weights and biases are then
    /// moved by `learning_rate * layer_input[i] * delta[j]`.
    ///
    /// Must follow the `apply` whose output is still cached.
    pub fn adjust(
        &mut self,
        layer_input: &[f64],
        downstream: &mut [f64],
        learning_rate: f64,
        upstream: Option<&mut [f64]>,
    ) {
        assert_eq!(layer_input.len(), self.input_len());
        assert_eq!(downstream.len(), self.output_len());

        for (d, &y) in downstream.iter_mut().zip(&self.output) {
            *d *= self.activator.derivative_given_output(y);
        }

        // Read the weights before the update below overwrites them.
        if let Some(upstream) = upstream {
            self.weights.multiply_into(downstream, upstream);
        }

        self.weights.add_outer(learning_rate, layer_input, downstream);
        for (b, &d) in self.bias.iter_mut().zip(downstream.iter()) {
            *b += learning_rate * d;
        }
    }

    /// Reinitializes weights and biases from a zero-centered normal
    /// distribution with variance `1 / fan-in`.
    pub fn randomise(&mut self) {
        self.randomise_with(&mut rand::thread_rng());
    }

    /// Like `randomise`, drawing samples from the provided `rng`.
    pub fn randomise_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let scale = (1.0 / self.input_len() as f64).sqrt();
        let mut sample = || scale * rng.sample::<f64, _>(StandardNormal);
        self.weights.fill_with(&mut sample);
        for b in self.bias.iter_mut() {
            *b = sample();
        }
    }
}
