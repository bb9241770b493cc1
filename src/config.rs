//! Configuration of a training run.
//!
//! All constants of the training loop live in [`TrainingConfig`]. The defaults
//! reproduce the classic lander setup; a run can also be described by a JSON
//! file and loaded with [`TrainingConfig::load`].
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{LanderError, Result};
use crate::exploration::EpsilonSchedule;
use crate::optimizer::OptimizerKind;

/// Configuration of a [`Trainer`](crate::trainer::Trainer) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of observations held by the frame stack.
    pub stack_size: usize,

    /// Upper bound on the number of episodes in a run.
    pub total_episodes: usize,

    /// Step cap per episode.
    pub max_steps: usize,

    /// Transitions sampled per training update.
    pub batch_size: usize,

    /// Step size handed to the approximator's optimizer.
    pub learning_rate: f32,

    /// Discount applied to the bootstrapped value.
    pub gamma: f32,

    /// Exploration probability schedule.
    pub epsilon: EpsilonSchedule,

    /// Capacity of the replay memory.
    pub memory_capacity: usize,

    /// Training only happens once the memory holds more than this many transitions.
    pub min_memory: usize,

    /// A terminal reward at or above this value ends the whole run.
    pub success_reward: f32,

    /// Widths of the approximator's hidden layers.
    pub hidden_layers: Vec<usize>,

    /// Activation of every hidden layer.
    pub hidden_activation: Activation,

    /// Update rule of the approximator.
    pub optimizer: OptimizerKind,

    /// Seed for every random stream of the run. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            stack_size: 15,
            total_episodes: 10_000,
            max_steps: 250,
            batch_size: 256,
            learning_rate: 0.00025,
            gamma: 0.618,
            epsilon: EpsilonSchedule::default(),
            memory_capacity: 250_000,
            min_memory: 500,
            success_reward: 200.0,
            hidden_layers: vec![50, 25, 10],
            hidden_activation: Activation::Relu,
            optimizer: OptimizerKind::default(),
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Sets the frame stack length.
    pub fn stack_size(mut self, v: usize) -> Self {
        self.stack_size = v;
        self
    }

    /// Sets the episode cap.
    pub fn total_episodes(mut self, v: usize) -> Self {
        self.total_episodes = v;
        self
    }

    /// Sets the step cap per episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the mini-batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn epsilon(mut self, v: EpsilonSchedule) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the replay memory capacity.
    pub fn memory_capacity(mut self, v: usize) -> Self {
        self.memory_capacity = v;
        self
    }

    /// Sets the training threshold on memory size.
    pub fn min_memory(mut self, v: usize) -> Self {
        self.min_memory = v;
        self
    }

    /// Sets the terminal reward that counts as a success.
    pub fn success_reward(mut self, v: f32) -> Self {
        self.success_reward = v;
        self
    }

    /// Sets the hidden layer widths of the approximator.
    pub fn hidden_layers(mut self, v: &[usize]) -> Self {
        self.hidden_layers = v.to_vec();
        self
    }

    /// Sets the hidden layer activation.
    pub fn hidden_activation(mut self, v: Activation) -> Self {
        self.hidden_activation = v;
        self
    }

    /// Sets the optimizer.
    pub fn optimizer(mut self, v: OptimizerKind) -> Self {
        self.optimizer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Checks that every constant is usable.
    ///
    /// `min_memory` must be at least `batch_size`, otherwise the first training
    /// update could sample from a memory that is too small.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if self.stack_size == 0 {
            return Err(LanderError::invalid_parameter("stack_size", "must be greater than 0"));
        }
        if self.max_steps == 0 {
            return Err(LanderError::invalid_parameter("max_steps", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(LanderError::invalid_parameter("batch_size", "must be greater than 0"));
        }
        if self.memory_capacity <= self.min_memory {
            return Err(LanderError::invalid_parameter(
                "memory_capacity",
                "must exceed min_memory or training never starts",
            ));
        }
        if self.min_memory < self.batch_size {
            return Err(LanderError::invalid_parameter(
                "min_memory",
                "must be at least batch_size",
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(LanderError::invalid_parameter("learning_rate", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(LanderError::invalid_parameter("gamma", "must lie in [0, 1]"));
        }
        if self.hidden_layers.iter().any(|&w| w == 0) {
            return Err(LanderError::invalid_parameter(
                "hidden_layers",
                "layer widths must be greater than 0",
            ));
        }
        self.epsilon.validate()
    }

    /// Random generator for one stream of the run.
    ///
    /// Streams with distinct ids are independent; with a seed set, the same id
    /// always yields the same sequence.
    pub fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))),
            None => StdRng::from_entropy(),
        }
    }

    /// Constructs a [`TrainingConfig`] from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
