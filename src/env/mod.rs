//! # Environments
//!
//! The training loop talks to a simulation only through [`Environment`]. The
//! crate ships [`LunarLander`], a small 2D rigid-body landing task, so the
//! binary can run without external simulators.

pub mod lunar_lander;

pub use lunar_lander::{LanderConfig, LunarLander, Outcome, StepInfo};

use ndarray::Array1;
use std::fmt::Debug;

use crate::error::Result;

/// Result of a single environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<I> {
    pub observation: Array1<f32>,
    pub reward: f32,
    pub done: bool,
    pub info: I,
}

/// An episodic environment with a discrete action space.
pub trait Environment {
    /// Extra information attached to each step.
    type Info: Debug;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Applies `action` and advances the simulation by one step.
    fn step(&mut self, action: usize) -> Result<Step<Self::Info>>;

    /// Number of discrete actions.
    fn action_space(&self) -> usize;

    /// Length of every observation.
    fn observation_dim(&self) -> usize;
}
