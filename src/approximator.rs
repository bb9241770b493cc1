//! The action-value estimator seen by the training loop.
use ndarray::{Array2, ArrayView2, ArrayView4};

use crate::error::Result;

/// A function approximator mapping stacked states to one value per action.
///
/// Inputs are batches shaped `(batch, feature_dim, stack_size, 1)`; outputs are
/// `(batch, action_space)`. The training loop owns the approximator for the
/// whole run and is its only user.
pub trait Approximator {
    /// Predicts action values for a batch of states.
    fn predict(&self, states: ArrayView4<f32>) -> Result<Array2<f32>>;

    /// Fits the approximator towards `labels` for one optimizer step and
    /// returns the batch loss.
    fn train_on_batch(&mut self, features: ArrayView4<f32>, labels: ArrayView2<f32>) -> Result<f32>;

    /// Width of the predicted value vectors.
    fn action_space(&self) -> usize;
}

impl<A: Approximator + ?Sized> Approximator for Box<A> {
    fn predict(&self, states: ArrayView4<f32>) -> Result<Array2<f32>> {
        (**self).predict(states)
    }

    fn train_on_batch(&mut self, features: ArrayView4<f32>, labels: ArrayView2<f32>) -> Result<f32> {
        (**self).train_on_batch(features, labels)
    }

    fn action_space(&self) -> usize {
        (**self).action_space()
    }
}
