//! Checked construction of `Network`s.

use crate::activator::Activator;
use crate::error::NetworkError;
use crate::feed_forward::Network;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Serializable description of a network's shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Width of the network input.
    pub inputs: usize,
    pub layers: Vec<LayerSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub width: usize,
    #[serde(default)]
    pub activator: Activator,
}

/// How the builder initializes parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Initialization {
    Zeros,
    Random,
    Seeded(u64),
}

/// Builds a new `Network`.
#[derive(Debug)]
pub struct NetworkBuilder {
    inputs: usize,
    layer_sizes: Vec<usize>,
    activators: Vec<Activator>,
    initialization: Initialization,
}

impl NetworkBuilder {
    /// Creates a new builder.
    ///
    /// Arguments:
    ///  * `inputs` - the width of the network input.
    ///  * `layers` - the number of neurons in each calculation layer, the
    ///               last being the output layer.
    ///
    /// By default every layer uses `Activator::Sigmoid` and all weights and
    /// biases start at zero.
    pub fn new(inputs: usize, layers: &[usize]) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::NoLayers);
        }
        if inputs == 0 {
            return Err(NetworkError::ZeroWidth { position: 0 });
        }
        if let Some(i) = layers.iter().position(|&width| width == 0) {
            return Err(NetworkError::ZeroWidth { position: i + 1 });
        }
        Ok(NetworkBuilder {
            inputs,
            layer_sizes: layers.into(),
            activators: vec![Activator::default(); layers.len()],
            initialization: Initialization::Zeros,
        })
    }

    /// Creates a builder from a serialized `Topology`.
    pub fn from_topology(topology: &Topology) -> Result<Self, NetworkError> {
        let widths: Vec<usize> =
            topology.layers.iter().map(|l| l.width).collect();
        let mut builder = NetworkBuilder::new(topology.inputs, &widths)?;
        for (i, spec) in topology.layers.iter().enumerate() {
            builder.activators[i] = spec.activator;
        }
        Ok(builder)
    }

    /// Sets the activation function for a single layer.
    pub fn activator(
        mut self,
        layer: usize,
        activator: Activator,
    ) -> Result<Self, NetworkError> {
        let count = self.activators.len();
        match self.activators.get_mut(layer) {
            Some(slot) => *slot = activator,
            None => {
                return Err(NetworkError::LayerOutOfRange {
                    index: layer,
                    count,
                })
            }
        }
        Ok(self)
    }

    /// Sets the activation function for every layer.
    pub fn activators(mut self, activator: Activator) -> Self {
        for slot in self.activators.iter_mut() {
            *slot = activator;
        }
        self
    }

    /// Whether to randomise the parameters when building.
    pub fn randomise(mut self, randomise: bool) -> Self {
        self.initialization = if randomise {
            Initialization::Random
        } else {
            Initialization::Zeros
        };
        self
    }

    /// Randomises the parameters from a fixed seed when building.
    pub fn seed(mut self, seed: u64) -> Self {
        self.initialization = Initialization::Seeded(seed);
        self
    }

    pub fn build(self) -> Network {
        let mut network = Network::new(
            self.inputs,
            &self.layer_sizes,
            Activator::default(),
        );
        for (i, &activator) in self.activators.iter().enumerate() {
            network.set_activator(i, activator);
        }
        match self.initialization {
            Initialization::Zeros => {}
            Initialization::Random => network.randomise(),
            Initialization::Seeded(seed) => {
                network.randomise_with(&mut StdRng::seed_from_u64(seed))
            }
        }
        network
    }
}
