//! Dense layer of a multi-layer perceptron.

use ndarray::{Array1, Array2, s};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a layer with Xavier-scaled Gaussian weights and biases drawn with `bias_scale`.
    pub fn new_xavier(
        input_size: usize,
        output_size: usize,
        bias_scale: f32,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            weights: xavier((output_size, input_size), input_size, rng),
            biases: gaussian(output_size, bias_scale, rng),
        }
    }

    /// Number of inputs the layer accepts.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of weights plus biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;

        // In-place tanh for better cache locality
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Adds `N(0, 1) * rate` to every weight and bias.
    ///
    /// # Returns
    ///
    /// The sum of absolute perturbations applied.
    pub fn mutate(&mut self, rate: f32, rng: &mut impl Rng) -> f32 {
        let mut total = 0.0;
        for value in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            let delta = rng.sample::<f32, _>(StandardNormal) * rate;
            *value += delta;
            total += delta.abs();
        }
        total
    }

    /// Returns a copy accepting `new_input_size` inputs.
    ///
    /// Overlapping weight columns are copied, new columns are Xavier-initialized
    /// for the new width, biases are kept.
    pub fn with_input_size(&self, new_input_size: usize, rng: &mut impl Rng) -> Self {
        let mut weights = xavier((self.output_size(), new_input_size), new_input_size, rng);
        let overlap = self.input_size().min(new_input_size);
        weights
            .slice_mut(s![.., ..overlap])
            .assign(&self.weights.slice(s![.., ..overlap]));

        Self {
            weights,
            biases: self.biases.clone(),
        }
    }
}

fn xavier(shape: (usize, usize), fan_in: usize, rng: &mut impl Rng) -> Array2<f32> {
    let scale = (1.0 / fan_in.max(1) as f32).sqrt();
    Array2::from_shape_fn(shape, |_| rng.sample::<f32, _>(StandardNormal) * scale)
}

fn gaussian(len: usize, scale: f32, rng: &mut impl Rng) -> Array1<f32> {
    if scale == 0.0 {
        return Array1::zeros(len);
    }
    Array1::from_shape_fn(len, |_| rng.sample::<f32, _>(StandardNormal) * scale)
}
