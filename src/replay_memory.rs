//! Bounded store of past transitions with uniform sampling.
use ndarray::Array2;
use rand::seq::index;
use rand::Rng;
use std::collections::VecDeque;

use crate::error::{LanderError, Result};

/// One recorded decision point.
///
/// Only the pre-step state is kept; there is no successor state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array2<f32>,
    pub action: usize,
    pub reward: f32,
}

/// Fixed-capacity FIFO buffer of transitions with uniform sampling.
#[derive(Clone)]
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        ReplayMemory {
            // Large capacities are filled lazily.
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Appends `transition`, evicting the oldest entry once the memory is full.
    pub fn append(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draws `batch_size` distinct transitions uniformly without replacement.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if self.buffer.len() < batch_size {
            return Err(LanderError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }
        Ok(index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|i| &self.buffer[i])
            .collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates stored transitions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
