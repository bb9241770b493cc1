//! Feed-forward network of dense layers.
use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::activations::Activation;
use crate::error::{LanderError, Result};
use crate::layers::DenseLayer;
use crate::loss::{Loss, MSE};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward neural network of dense layers trained with an optimizer.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a network with the given layer sizes and one activation per layer.
    ///
    /// `layer_sizes` includes the input width and the output width.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(LanderError::invalid_parameter(
                "layer_sizes",
                "must have at least an input and an output layer",
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(LanderError::invalid_parameter("layer_sizes", "layer sizes must be greater than 0"));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(LanderError::invalid_parameter(
                "activations",
                "number of activations must match number of layers - 1",
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, rng))
            .collect();

        Ok(NeuralNetwork { layers, optimizer })
    }

    pub fn with_layers(mut self, layers: Vec<DenseLayer>) -> Self {
        self.layers = layers;
        self
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    /// Forward pass for a batch of input rows.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_inputs(inputs)?;
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.forward_batch(current.view());
        }
        Ok(current)
    }

    /// One gradient step on a batch under mean squared error.
    ///
    /// Returns the loss measured before the update.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        self.check_inputs(inputs)?;
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(LanderError::dimension_mismatch(
                format!("{:?}", (inputs.nrows(), self.output_size())),
                format!("{:?}", targets.dim()),
            ));
        }

        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            let (outputs, cache) = layer.forward_cached(current.view());
            caches.push(cache);
            current = outputs;
        }

        let loss = MSE.compute_batch(current.view(), targets);
        let mut error = MSE.gradient_batch(current.view(), targets);

        let mut gradients = Vec::with_capacity(self.layers.len());
        for (layer, cache) in self.layers.iter().zip(caches.iter()).rev() {
            let grads = layer.backward_batch(cache, error.view());
            error = grads.input_error.clone();
            gradients.push(grads);
        }
        gradients.reverse();

        for (i, (layer, grads)) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(i, &mut layer.weights, &grads.weights, learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &grads.biases, learning_rate);
        }
        self.optimizer.step();

        Ok(loss)
    }

    fn check_inputs(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(LanderError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(())
    }
}
