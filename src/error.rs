use thiserror::Error;

/// Errors raised while configuring or training a network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("a network needs at least one calculation layer")]
    NoLayers,
    #[error("layer widths must be positive, found zero at position {position}")]
    ZeroWidth { position: usize },
    #[error("layer {index} is out of range for a network of {count} layers")]
    LayerOutOfRange { index: usize, count: usize },
    #[error("shape mismatch: expected length {expected}, found {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("no training examples were provided")]
    NoExamples,
}
