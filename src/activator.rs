//! Activation function types.

use serde::{Deserialize, Serialize};

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Passes the pre-activation through unchanged. Range `(-inf, inf)`.
    Identity,
    /// Rectified Linear Unit. Range `[0, inf)`.
    Rectifier,
    /// Logistic function. Range `(0, 1)`.
    #[default]
    Sigmoid,
    /// Normalised exponential over the whole layer. Outputs sum to one.
    Softmax,
    /// Hyperbolic tangent. Range `(-1, 1)`.
    TanH,
}

impl Activator {
    /// Prepares the transform for one layer's worth of `pre_activation`
    /// values.
    ///
    /// Every variant except `Softmax` is elementwise and ignores the vector.
    /// `Softmax` sums the exponentials once here so the returned transform
    /// can normalise each element independently.
    pub fn materialize(&self, pre_activation: &[f64]) -> Transform {
        let normaliser = match self {
            Activator::Softmax => pre_activation.iter().map(|x| x.exp()).sum(),
            _ => 1.0,
        };
        Transform {
            activator: *self,
            normaliser,
        }
    }

    /// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input. Layers only keep their activated
    /// output around, so every derivative has to be expressible this way.
    ///
    /// `Softmax` reports a constant 1 rather than a Jacobian row.
    pub fn derivative_given_output(&self, y: f64) -> f64 {
        match self {
            Activator::Identity => 1.0,
            Activator::Rectifier => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::Sigmoid => y * (1.0 - y),
            Activator::Softmax => 1.0,
            Activator::TanH => 1.0 - y * y,
        }
    }
}

/// An activation function bound to the context of a single pre-activation
/// vector.
#[derive(Copy, Clone, Debug)]
pub struct Transform {
    activator: Activator,
    normaliser: f64,
}

impl Transform {
    /// Evaluates `f(x)` for one element of the vector this transform was
    /// materialized from.
    pub fn apply(&self, x: f64) -> f64 {
        match self.activator {
            Activator::Identity => x,
            Activator::Rectifier => x.max(0.0),
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::Softmax => x.exp() / self.normaliser,
            Activator::TanH => x.tanh(),
        }
    }
}
