use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss for a batch
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean Squared Error loss
///
/// Averaged over every output of every sample, so label entries equal to the
/// prediction contribute neither loss nor gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSE;

impl Loss for MSE {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        let n = (predictions.len() as f32).max(1.0);
        (&predictions - &targets) * (2.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_ignores_matching_entries() {
        let predictions = array![[1.0, 2.0], [3.0, 4.0]];
        let targets = array![[1.0, 2.0], [3.0, 6.0]];
        assert!((MSE.compute_batch(predictions.view(), targets.view()) - 1.0).abs() < 1e-6);
        let grad = MSE.gradient_batch(predictions.view(), targets.view());
        assert_eq!(grad, array![[0.0, 0.0], [0.0, -1.0]]);
    }
}
