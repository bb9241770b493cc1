//! One-hot action codes.
use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{LanderError, Result};

/// A one-hot encoded discrete action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCode(Array1<f32>);

impl ActionCode {
    /// Recovers the action index by taking the arg-max of the code.
    pub fn index(&self) -> usize {
        argmax(self.0.view())
    }

    pub fn as_array(&self) -> &Array1<f32> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The immutable table of action codes: the rows of an identity matrix.
#[derive(Clone, Debug)]
pub struct ActionCodes {
    table: Array2<f32>,
}

impl ActionCodes {
    pub fn new(action_space: usize) -> Result<Self> {
        if action_space == 0 {
            return Err(LanderError::invalid_parameter("action_space", "must be greater than 0"));
        }
        Ok(ActionCodes { table: Array2::eye(action_space) })
    }

    /// Number of distinct actions.
    pub fn action_space(&self) -> usize {
        self.table.nrows()
    }

    /// Returns the code for `index`.
    pub fn code(&self, index: usize) -> Result<ActionCode> {
        if index >= self.action_space() {
            return Err(LanderError::InvalidAction {
                action: index,
                max_actions: self.action_space(),
            });
        }
        Ok(ActionCode(self.table.row(index).to_owned()))
    }
}

/// Index of the largest value; the first one wins on ties.
///
/// A NaN counts as the maximum, so the index of the first NaN is returned.
pub fn argmax(values: ArrayView1<f32>) -> usize {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            return idx;
        }
        if value > best {
            best = value;
            best_idx = idx;
        }
    }
    best_idx
}
