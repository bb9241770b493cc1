//! Dense Q-network behind the [`Approximator`] interface.
use ndarray::{Array2, ArrayView2, ArrayView4};
use rand::Rng;

use crate::activations::Activation;
use crate::approximator::Approximator;
use crate::config::TrainingConfig;
use crate::error::{LanderError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::OptimizerKind;

/// A feed-forward Q-network over flattened frame stacks.
///
/// Input batches shaped `(batch, feature_dim, stack_size, 1)` are flattened to
/// `(batch, feature_dim * stack_size)` and passed through the hidden layers to
/// one linear output per action.
#[derive(Debug, Clone)]
pub struct QNetwork {
    network: NeuralNetwork,
    feature_dim: usize,
    stack_size: usize,
    learning_rate: f32,
}

impl QNetwork {
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng + ?Sized>(
        feature_dim: usize,
        stack_size: usize,
        action_space: usize,
        hidden_layers: &[usize],
        hidden_activation: Activation,
        optimizer: OptimizerKind,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden_layers.len() + 2);
        layer_sizes.push(feature_dim * stack_size);
        layer_sizes.extend_from_slice(hidden_layers);
        layer_sizes.push(action_space);

        let mut activations = vec![hidden_activation; hidden_layers.len()];
        activations.push(Activation::Linear);

        let network = NeuralNetwork::new(&layer_sizes, &activations, optimizer.build(), rng)?;
        Ok(QNetwork { network, feature_dim, stack_size, learning_rate })
    }

    /// Builds the network described by `config` for an environment with the
    /// given observation width and number of actions.
    pub fn from_config<R: Rng + ?Sized>(
        config: &TrainingConfig,
        feature_dim: usize,
        action_space: usize,
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(
            feature_dim,
            config.stack_size,
            action_space,
            &config.hidden_layers,
            config.hidden_activation,
            config.optimizer,
            config.learning_rate,
            rng,
        )
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    fn flatten(&self, states: ArrayView4<f32>) -> Result<Array2<f32>> {
        let (batch, feature_dim, stack_size, channels) = states.dim();
        if (feature_dim, stack_size, channels) != (self.feature_dim, self.stack_size, 1) {
            return Err(LanderError::dimension_mismatch(
                format!("(batch, {}, {}, 1)", self.feature_dim, self.stack_size),
                format!("{:?}", states.dim()),
            ));
        }
        Ok(Array2::from_shape_vec(
            (batch, feature_dim * stack_size),
            states.iter().copied().collect(),
        )?)
    }
}

impl Approximator for QNetwork {
    fn predict(&self, states: ArrayView4<f32>) -> Result<Array2<f32>> {
        let inputs = self.flatten(states)?;
        self.network.forward_batch(inputs.view())
    }

    fn train_on_batch(&mut self, features: ArrayView4<f32>, labels: ArrayView2<f32>) -> Result<f32> {
        let inputs = self.flatten(features)?;
        self.network.train_minibatch(inputs.view(), labels, self.learning_rate)
    }

    fn action_space(&self) -> usize {
        self.network.output_size()
    }
}
