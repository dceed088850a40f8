use crate::backend::{Backend, Scalar, Tensor1D};

/// A differentiable loss used during training.
///
/// Implementors provide the scalar loss (for logging and the stopping rule)
/// and its gradient with respect to the model's predictions, which is fed to
/// the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Scalar loss value.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// `∂L/∂prediction`.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean squared error: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// Gradient: `(pred - target) / n`. The factor of 2 is absorbed into the
/// learning rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Tensor1D<B>, target: &Tensor1D<B>) -> Scalar<B> {
        if pred.is_empty() {
            return Scalar::new(0.0);
        }
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::<B>::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Tensor1D<B>, target: &Tensor1D<B>) -> Tensor1D<B> {
        let n = Scalar::<B>::new(1. / pred.len().max(1) as f64);
        pred.sub(target).scale(&n)
    }
}
