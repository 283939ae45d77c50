//! Loss functions used to seed backpropagation.

use itertools::multizip;
use serde::{Deserialize, Serialize};

/// Elementwise error measures between a target and a network output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorMetric {
    /// `-target * ln(current)`
    CrossEntropy,
    /// `(target - current)^2 / 2`
    #[default]
    HalfSquaredDifference,
}

impl ErrorMetric {
    /// The error contributed by a single element.
    pub fn value(&self, target: f64, current: f64) -> f64 {
        match self {
            ErrorMetric::CrossEntropy => -target * current.ln(),
            ErrorMetric::HalfSquaredDifference => {
                let diff = target - current;
                0.5 * diff * diff
            }
        }
    }

    /// The derivative of `value` with respect to `current`.
    pub fn derivative(&self, target: f64, current: f64) -> f64 {
        match self {
            ErrorMetric::CrossEntropy | ErrorMetric::HalfSquaredDifference => {
                current - target
            }
        }
    }

    /// Sums the elementwise error over two vectors.
    ///
    /// Mismatched lengths are not an error; only the common prefix is
    /// compared.
    pub fn total(&self, target: &[f64], current: &[f64]) -> f64 {
        target
            .iter()
            .zip(current)
            .map(|(&t, &c)| self.value(t, c))
            .sum()
    }

    /// Writes the elementwise derivative into `gradient`.
    ///
    /// Positions beyond the shorter of `target` and `current` are zeroed.
    pub fn gradient_into(
        &self,
        target: &[f64],
        current: &[f64],
        gradient: &mut [f64],
    ) {
        for g in gradient.iter_mut() {
            *g = 0.0;
        }
        for (g, &t, &c) in multizip((gradient.iter_mut(), target, current)) {
            *g = self.derivative(t, c);
        }
    }
}
