//! A small feed-forward neural network with backpropagation training.
//!
//! Networks are stacks of `CalculationLayer`s, each an affine transform
//! followed by an `Activator`. See `feed_forward` for an example.

pub mod activator;
pub mod builder;
pub mod error;
pub mod error_metric;
pub mod feed_forward;
pub mod layer;
pub mod trainer;

mod matrix;

pub use crate::activator::Activator;
pub use crate::builder::{LayerSpec, NetworkBuilder, Topology};
pub use crate::error::NetworkError;
pub use crate::error_metric::ErrorMetric;
pub use crate::feed_forward::Network;
pub use crate::layer::CalculationLayer;
