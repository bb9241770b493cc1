//! One-step Bellman targets for a sampled batch.
use ndarray::{s, Array2, Array4, ArrayView1};

use crate::approximator::Approximator;
use crate::error::{LanderError, Result};
use crate::replay_memory::Transition;

/// Features and labels ready for [`Approximator::train_on_batch`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingBatch {
    /// `(batch, feature_dim, stack_size, 1)`
    pub features: Array4<f32>,
    /// `(batch, action_space)`
    pub labels: Array2<f32>,
}

/// Stacks transition states into the approximator's batched input shape.
pub fn stack_states(transitions: &[&Transition]) -> Result<Array4<f32>> {
    let first = transitions
        .first()
        .ok_or(LanderError::InsufficientData { requested: 1, available: 0 })?;
    let (feature_dim, stack_size) = first.state.dim();

    let mut states = Array4::zeros((transitions.len(), feature_dim, stack_size, 1));
    for (i, transition) in transitions.iter().enumerate() {
        if transition.state.dim() != (feature_dim, stack_size) {
            return Err(LanderError::dimension_mismatch(
                format!("{:?}", (feature_dim, stack_size)),
                format!("{:?}", transition.state.dim()),
            ));
        }
        states.slice_mut(s![i, .., .., 0]).assign(&transition.state);
    }
    Ok(states)
}

/// Builds regression targets for a sampled batch.
///
/// The bootstrap value for each sample is taken from the same state the
/// transition was recorded in. Only the label of the taken action is replaced
/// by `reward + gamma * max(prediction)`; every other label keeps the
/// approximator's own prediction so it contributes no error.
pub fn build_training_batch<A: Approximator + ?Sized>(
    approximator: &A,
    transitions: &[&Transition],
    gamma: f32,
) -> Result<TrainingBatch> {
    let states = stack_states(transitions)?;
    let action_space = approximator.action_space();
    let batch_size = transitions.len();

    let next_values = approximator.predict(states.view())?;
    check_prediction_shape(&next_values, batch_size, action_space)?;
    let targets: Vec<f32> = next_values
        .rows()
        .into_iter()
        .zip(transitions)
        .map(|(row, transition)| {
            gamma * max_value(row) + transition.reward
        })
        .collect();

    let mut labels = approximator.predict(states.view())?;
    check_prediction_shape(&labels, batch_size, action_space)?;
    for (i, (transition, target)) in transitions.iter().zip(targets).enumerate() {
        if transition.action >= action_space {
            return Err(LanderError::InvalidAction {
                action: transition.action,
                max_actions: action_space,
            });
        }
        labels[[i, transition.action]] = target;
    }

    Ok(TrainingBatch { features: states, labels })
}

/// Largest entry of `row`; a NaN anywhere makes the result NaN.
fn max_value(row: ArrayView1<f32>) -> f32 {
    row.iter().copied().fold(f32::NEG_INFINITY, |max, v| {
        if max.is_nan() || v.is_nan() {
            f32::NAN
        } else {
            max.max(v)
        }
    })
}

fn check_prediction_shape(predictions: &Array2<f32>, batch_size: usize, action_space: usize) -> Result<()> {
    if predictions.dim() != (batch_size, action_space) {
        return Err(LanderError::dimension_mismatch(
            format!("{:?}", (batch_size, action_space)),
            format!("{:?}", predictions.dim()),
        ));
    }
    Ok(())
}
