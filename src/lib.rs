//! # Lander - Deep Q-Learning for a Lunar Landing Task
//!
//! Lander trains a Q-value approximator to land a 2D lunar module. An agent
//! stacks the most recent observations into a state, picks actions with a
//! decaying epsilon-greedy policy, stores transitions in a bounded replay
//! memory and, after each episode, fits the approximator on a sampled batch
//! of bootstrapped targets. The run stops at the first successful landing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lander::config::TrainingConfig;
//! use lander::env::{Environment, LanderConfig, LunarLander};
//! use lander::q_network::QNetwork;
//! use lander::trainer::{streams, Trainer};
//!
//! let config = TrainingConfig::default().total_episodes(100).seed(7);
//! let env = LunarLander::new(LanderConfig::default(), config.rng(streams::ENVIRONMENT));
//! let network = QNetwork::from_config(
//!     &config,
//!     env.observation_dim(),
//!     env.action_space(),
//!     &mut config.rng(streams::WEIGHTS),
//! )?;
//!
//! let mut trainer = Trainer::new(config, env, network)?;
//! let outcome = trainer.run()?;
//! println!("{} episodes, success: {}", outcome.episodes(), outcome.success);
//! # Ok::<(), lander::error::LanderError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`action`] - One-hot action codes
//! - [`activations`] - Activation functions
//! - [`approximator`] - The Q-value approximator interface
//! - [`config`] - Training constants and their JSON form
//! - [`env`] - Environment interface and the lunar lander
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon schedule and action selection
//! - [`frame_stack`] - Sliding window of recent observations
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Loss functions for training
//! - [`network`] - Feed-forward neural network
//! - [`optimizer`] - Optimization algorithms
//! - [`q_network`] - The network used as approximator
//! - [`replay_memory`] - Bounded transition store
//! - [`report`] - Score charts and exports
//! - [`targets`] - Bootstrapped training targets
//! - [`trainer`] - The training loop

pub mod action;
pub mod activations;
pub mod approximator;
pub mod config;
pub mod env;
pub mod error;
pub mod exploration;
pub mod frame_stack;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod q_network;
pub mod replay_memory;
pub mod report;
pub mod targets;
pub mod trainer;

#[cfg(test)]
mod tests;
