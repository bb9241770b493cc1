//! Temporal window over the most recent observations.
use std::collections::VecDeque;

use ndarray::{stack, Array1, Array2, ArrayView1, Axis};

use crate::error::{LanderError, Result};

/// A fixed-length stack of observations, oldest first.
///
/// The stack is treated as a value: [`FrameStack::update`] consumes it and hands
/// back the next stack together with the state tensor built from it, so a stack
/// from one episode can never leak into another through aliasing.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStack {
    frames: VecDeque<Array1<f32>>,
    stack_size: usize,
}

impl FrameStack {
    /// Creates a stack of `stack_size` zero observations of length `feature_dim`.
    pub fn new(stack_size: usize, feature_dim: usize) -> Self {
        let frames = (0..stack_size).map(|_| Array1::zeros(feature_dim)).collect();
        FrameStack { frames, stack_size }
    }

    /// Pushes `observation` and returns the `(feature_dim, stack_size)` state tensor
    /// with the updated stack.
    ///
    /// When `is_new_episode` is set the stack is refilled with `stack_size`
    /// copies of `observation`; otherwise the observation is appended and the
    /// oldest frame dropped.
    pub fn update(
        mut self,
        observation: ArrayView1<f32>,
        is_new_episode: bool,
    ) -> Result<(Array2<f32>, FrameStack)> {
        if is_new_episode {
            self.frames.clear();
            for _ in 0..self.stack_size {
                self.frames.push_back(observation.to_owned());
            }
        } else {
            let feature_dim = self.feature_dim();
            if observation.len() != feature_dim {
                return Err(LanderError::dimension_mismatch(
                    format!("observation of length {}", feature_dim),
                    format!("observation of length {}", observation.len()),
                ));
            }
            self.frames.push_back(observation.to_owned());
            while self.frames.len() > self.stack_size {
                self.frames.pop_front();
            }
        }

        let state = self.state()?;
        Ok((state, self))
    }

    /// Stacks the held frames along axis 1.
    pub fn state(&self) -> Result<Array2<f32>> {
        let views: Vec<_> = self.frames.iter().map(|frame| frame.view()).collect();
        Ok(stack(Axis(1), &views)?)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Length of a single observation.
    pub fn feature_dim(&self) -> usize {
        self.frames.front().map_or(0, |frame| frame.len())
    }

    /// Iterates the frames from oldest to newest.
    pub fn frames(&self) -> impl Iterator<Item = &Array1<f32>> {
        self.frames.iter()
    }
}
