//! Feedforward neural network used as a vehicle's driving genome.
//!
//! The network has a fixed topology given by `layer_sizes`. Weights for each
//! adjacent layer pair are stored as one flat buffer with a bias slot per
//! destination neuron, and forward propagation applies a sigmoid activation.
//! Evolution happens through [`NeuralNetwork::clone_mutated`], which perturbs
//! weights relative to a baseline ("parent") network.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Probability that a weight cell is perturbed during mutation.
const MUTATION_PROBABILITY: f32 = 0.25;
/// Scale applied to the uniform jitter added to a selected cell.
const MUTATION_JITTER: f32 = 0.1;
/// Amplification applied to a selected cell's drift from the baseline.
///
/// A cell that already moved away from the baseline is pushed further in the
/// same direction; a cell with zero drift receives only jitter when selected.
const DRIFT_GAIN: f32 = 10.0;

/// Errors produced by network operations on caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrainError {
    /// The input vector length does not match the input layer size.
    InvalidInputSize {
        /// Size of the input layer.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },
    /// Mutation was attempted against a network with a different topology.
    IncompatibleTopology {
        /// Layer sizes of this network.
        expected: Vec<usize>,
        /// Layer sizes of the baseline network.
        got: Vec<usize>,
    },
}

impl fmt::Display for BrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrainError::InvalidInputSize { expected, got } => {
                write!(f, "invalid input size: expected {expected}, got {got}")
            }
            BrainError::IncompatibleTopology { expected, got } => {
                write!(
                    f,
                    "incompatible topology: expected layers {expected:?}, got {got:?}"
                )
            }
        }
    }
}

impl Error for BrainError {}

/// Sigmoid activation, maps any real value into (0, 1).
fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

/// A fixed-topology feedforward neural network with sigmoid activations.
///
/// For layer pair `i`, the weight buffer holds
/// `(layer_sizes[i] + 1) * layer_sizes[i + 1]` cells: the weight from source
/// neuron `s` to destination neuron `d` lives at
/// `d * (layer_sizes[i] + 1) + s`, and the bias for `d` occupies the extra
/// slot at `d * (layer_sizes[i] + 1) + layer_sizes[i]`. Buffer lengths are
/// fixed by `layer_sizes` at construction and must never be resized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetwork {
    /// Neuron count per layer, input first. Always at least two entries.
    pub layer_sizes: Vec<usize>,
    /// Flat weight buffer per adjacent layer pair, bias slots included.
    pub weights: Vec<Array1<f32>>,
    /// Current activation per layer, updated in place by propagation.
    pub layer_values: Vec<Array1<f32>>,
}

impl NeuralNetwork {
    /// Creates a network with weights drawn uniformly from [-1, 1) using the
    /// process-wide generator.
    ///
    /// # Panics
    ///
    /// Panics if `layer_sizes` has fewer than two entries.
    pub fn new(layer_sizes: &[usize]) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "a network needs an input and an output layer"
        );

        let weights = (0..layer_sizes.len() - 1)
            .map(|i| {
                let len = (layer_sizes[i] + 1) * layer_sizes[i + 1];
                Array1::random(len, Uniform::new(-1., 1.))
            })
            .collect();

        Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            layer_values: layer_sizes.iter().map(|&n| Array1::zeros(n)).collect(),
        }
    }

    /// Creates a network with weights drawn uniformly from [-1, 1) using a
    /// caller-supplied generator, for reproducible construction.
    ///
    /// # Panics
    ///
    /// Panics if `layer_sizes` has fewer than two entries.
    pub fn new_with<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        assert!(
            layer_sizes.len() >= 2,
            "a network needs an input and an output layer"
        );

        let weights = (0..layer_sizes.len() - 1)
            .map(|i| {
                let len = (layer_sizes[i] + 1) * layer_sizes[i + 1];
                Array1::from_shape_fn(len, |_| rng.random_range(-1.0..1.0))
            })
            .collect();

        Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            layer_values: layer_sizes.iter().map(|&n| Array1::zeros(n)).collect(),
        }
    }

    /// Copies `values` into the input layer.
    pub fn set_input(&mut self, values: &Array1<f32>) -> Result<(), BrainError> {
        let expected = self.layer_sizes[0];
        if values.len() != expected {
            return Err(BrainError::InvalidInputSize {
                expected,
                got: values.len(),
            });
        }
        self.layer_values[0].assign(values);
        Ok(())
    }

    /// Propagates the current input layer through the network.
    ///
    /// Every layer is fully recomputed from the input layer on each call;
    /// nothing is cached across calls.
    pub fn forward_propagate(&mut self) {
        for to_layer in 1..self.layer_sizes.len() {
            let from_layer = to_layer - 1;
            let from_size = self.layer_sizes[from_layer];
            let to_size = self.layer_sizes[to_layer];
            let stride = from_size + 1;

            let weights = &self.weights[from_layer];
            let (inputs, outputs) = self.layer_values.split_at_mut(to_layer);
            let inputs = &inputs[from_layer];
            let outputs = &mut outputs[0];

            for to_cell in 0..to_size {
                let row = to_cell * stride;
                // Bias slot sits after the per-source weights of this row.
                let mut sum = weights[row + from_size];
                for from_cell in 0..from_size {
                    sum += weights[row + from_cell] * inputs[from_cell];
                }
                outputs[to_cell] = sigmoid(sum);
            }
        }
    }

    /// Read-only view of the output layer's activations.
    pub fn output(&self) -> &Array1<f32> {
        &self.layer_values[self.layer_sizes.len() - 1]
    }

    /// Creates a mutated copy of this network, measured against `baseline`.
    ///
    /// Per weight cell, with probability 0.25, the cell becomes
    /// `current + uniform(-0.5, 0.5) * 0.1 + (current - baseline) * 10`;
    /// otherwise it is copied unchanged. Cells that drifted from the baseline
    /// get pushed further in the drift direction, so the operator behaves
    /// like momentum across generations. The clone's activations start
    /// zeroed.
    pub fn clone_mutated<R: Rng + ?Sized>(
        &self,
        baseline: &NeuralNetwork,
        rng: &mut R,
    ) -> Result<NeuralNetwork, BrainError> {
        if self.layer_sizes != baseline.layer_sizes {
            return Err(BrainError::IncompatibleTopology {
                expected: self.layer_sizes.clone(),
                got: baseline.layer_sizes.clone(),
            });
        }

        let weights = self
            .weights
            .iter()
            .zip(&baseline.weights)
            .map(|(current, base)| {
                let mut mutated = current.clone();
                for (cell, &base_cell) in mutated.iter_mut().zip(base.iter()) {
                    let drift = *cell - base_cell;
                    if rng.random::<f32>() < MUTATION_PROBABILITY {
                        *cell += rng.random_range(-0.5..0.5) * MUTATION_JITTER + drift * DRIFT_GAIN;
                    }
                }
                mutated
            })
            .collect();

        Ok(NeuralNetwork {
            layer_sizes: self.layer_sizes.clone(),
            weights,
            layer_values: self.layer_sizes.iter().map(|&n| Array1::zeros(n)).collect(),
        })
    }
}
