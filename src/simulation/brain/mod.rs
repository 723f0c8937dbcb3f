//! Neural network implementation for agent brains.
//!
//! Every agent steers with a fixed-topology two-layer perceptron
//! (input → hidden → output, tanh activations) that maps its sensor vector to
//! a turn and a throttle intent.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod mlp;

pub use mlp::Mlp;

/// Number of brain outputs: turn intent and throttle intent.
pub const OUTPUT_SIZE: usize = 2;

/// Scale of the near-zero Gaussian output biases drawn at construction.
const OUTPUT_BIAS_SCALE: f32 = 0.01;

/// Feed-forward control policy owned by a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Input → hidden layer.
    pub hidden: Mlp,
    /// Hidden → output layer.
    pub output: Mlp,
}

/// Steering intents decoded from the brain's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    /// Turn intent in `[-1, 1]`.
    pub turn: f32,
    /// Throttle intent in `[-1, 1]`.
    pub throttle: f32,
}

impl Intent {
    /// Throttle mapped to a speed fraction in `[0, 1]`.
    pub fn speed_fraction(&self) -> f32 {
        ((self.throttle + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl Brain {
    /// Creates a new brain with Xavier weights, zero hidden biases and near-zero output biases.
    pub fn new(input_size: usize, hidden_size: usize, rng: &mut impl Rng) -> Self {
        Self {
            hidden: Mlp::new_xavier(input_size, hidden_size, 0.0, rng),
            output: Mlp::new_xavier(hidden_size, OUTPUT_SIZE, OUTPUT_BIAS_SCALE, rng),
        }
    }

    /// Number of inputs the brain expects.
    pub fn input_size(&self) -> usize {
        self.hidden.input_size()
    }

    /// Width of the hidden layer.
    pub fn hidden_size(&self) -> usize {
        self.hidden.output_size()
    }

    /// Runs a forward pass through the brain.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` does not have exactly [`input_size`](Self::input_size)
    /// elements; that means the sensor and brain widths drifted apart.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        assert_eq!(
            inputs.len(),
            self.input_size(),
            "brain expects {} inputs, got {}",
            self.input_size(),
            inputs.len()
        );
        self.output.forward(&self.hidden.forward(inputs))
    }

    /// Runs a forward pass and decodes the two steering intents.
    pub fn decide(&self, inputs: &Array1<f32>) -> Intent {
        let out = self.think(inputs);
        Intent {
            turn: out[0],
            throttle: out[1],
        }
    }

    /// Clones the brain and perturbs every parameter by `N(0, 1) * rate`.
    ///
    /// # Returns
    ///
    /// The mutated clone and the mean absolute perturbation over all parameters.
    pub fn clone_with_mutation(&self, rate: f32, rng: &mut impl Rng) -> (Self, f32) {
        let mut clone = self.clone();
        let total = clone.hidden.mutate(rate, rng) + clone.output.mutate(rate, rng);
        let count = clone.hidden.parameter_count() + clone.output.parameter_count();
        (clone, total / count as f32)
    }

    /// Returns a copy accepting `new_input_size` inputs.
    ///
    /// Overlapping input weights and the whole output layer are preserved
    /// exactly; weights for new inputs are freshly initialized.
    pub fn resize_input(&self, new_input_size: usize, rng: &mut impl Rng) -> Self {
        Self {
            hidden: self.hidden.with_input_size(new_input_size, rng),
            output: self.output.clone(),
        }
    }
}
