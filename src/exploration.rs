//! Epsilon-greedy action selection with exponential decay.
use log::trace;
use ndarray::{ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::{argmax, ActionCode, ActionCodes};
use crate::approximator::Approximator;
use crate::error::{LanderError, Result};

/// Exploration probability as a function of the cumulative step count.
///
/// `epsilon(step) = min + (max - min) * exp(-decay_rate * step)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub min_epsilon: f32,
    pub max_epsilon: f32,
    pub decay_rate: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        EpsilonSchedule {
            min_epsilon: 0.01,
            max_epsilon: 1.0,
            decay_rate: 0.00001,
        }
    }
}

impl EpsilonSchedule {
    pub fn new(min_epsilon: f32, max_epsilon: f32, decay_rate: f64) -> Result<Self> {
        let schedule = EpsilonSchedule { min_epsilon, max_epsilon, decay_rate };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_epsilon) || !(0.0..=1.0).contains(&self.max_epsilon) {
            return Err(LanderError::invalid_parameter("epsilon", "bounds must lie in [0, 1]"));
        }
        if self.min_epsilon > self.max_epsilon {
            return Err(LanderError::invalid_parameter(
                "epsilon",
                "min_epsilon must not exceed max_epsilon",
            ));
        }
        if !(self.decay_rate >= 0.0 && self.decay_rate.is_finite()) {
            return Err(LanderError::invalid_parameter("decay_rate", "must be non-negative"));
        }
        Ok(())
    }

    /// Exploration probability after `step` environment steps.
    pub fn epsilon(&self, step: u64) -> f32 {
        let decay = (-self.decay_rate * step as f64).exp() as f32;
        let epsilon = self.min_epsilon + (self.max_epsilon - self.min_epsilon) * decay;
        epsilon.clamp(self.min_epsilon, self.max_epsilon)
    }
}

/// Chooses between a uniformly random action and the approximator's greedy one.
pub struct ExplorationPolicy {
    schedule: EpsilonSchedule,
    codes: ActionCodes,
    rng: StdRng,
}

impl ExplorationPolicy {
    pub fn new(schedule: EpsilonSchedule, codes: ActionCodes, rng: StdRng) -> Self {
        ExplorationPolicy { schedule, codes, rng }
    }

    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    pub fn codes(&self) -> &ActionCodes {
        &self.codes
    }

    /// Selects an action for `state` (shaped `(feature_dim, stack_size)`).
    ///
    /// Returns the one-hot code of the chosen action; use [`ActionCode::index`]
    /// to get the index back.
    pub fn select_action<A: Approximator + ?Sized>(
        &mut self,
        approximator: &A,
        state: ArrayView2<f32>,
        step: u64,
    ) -> Result<ActionCode> {
        let tradeoff: f32 = self.rng.gen();
        let epsilon = self.schedule.epsilon(step);

        let choice = if epsilon > tradeoff {
            let choice = self.rng.gen_range(0..self.codes.action_space());
            trace!("step {}: random action {} (epsilon {:.4})", step, choice, epsilon);
            choice
        } else {
            let input = state.insert_axis(Axis(0)).insert_axis(Axis(3));
            let predictions = approximator.predict(input)?;
            if predictions.nrows() != 1 || predictions.ncols() != self.codes.action_space() {
                return Err(LanderError::dimension_mismatch(
                    format!("(1, {})", self.codes.action_space()),
                    format!("{:?}", predictions.dim()),
                ));
            }
            let choice = argmax(predictions.row(0));
            trace!("step {}: greedy action {} (epsilon {:.4})", step, choice, epsilon);
            choice
        };

        self.codes.code(choice)
    }
}
