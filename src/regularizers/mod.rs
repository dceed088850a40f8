use crate::backend::{Backend, Scalar, Tensor1D};
use crate::model::{LinearParams, LinearRegression, TrainableModel};

/// A penalty on model parameters added to the training loss.
///
/// Returns the penalty value and its gradient with respect to the model
/// parameters.
pub trait Regularizer<B: Backend, M: TrainableModel<B>> {
    fn regularizer_penalty_grad(&self, model: &M) -> (Scalar<B>, M::Gradients);
}

/// Ridge penalty `λ·‖w‖²`. The bias is not penalized.
///
/// The gradient is `λ·w`, half the true one, matching the scaling of
/// [`crate::loss::MSELoss`] so the pair descends on `MSE + λ·‖w‖²`.
#[derive(Clone, Copy, Debug)]
pub struct L2<B: Backend> {
    lambda: Scalar<B>,
}

impl<B: Backend> L2<B> {
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda: Scalar::new(lambda),
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda.to_f64()
    }
}

impl<B: Backend> Regularizer<B, LinearRegression<B>> for L2<B> {
    fn regularizer_penalty_grad(&self, model: &LinearRegression<B>) -> (Scalar<B>, LinearParams<B>) {
        let params = model.params();
        let penalty = self.lambda * params.weights.dot(&params.weights);
        let weight_grad = params.weights.scale(&self.lambda);
        (
            penalty,
            LinearParams {
                weights: weight_grad,
                bias: Scalar::new(0.0),
            },
        )
    }
}

/// No penalty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRegularizer;

impl<B: Backend> Regularizer<B, LinearRegression<B>> for NoRegularizer {
    fn regularizer_penalty_grad(&self, model: &LinearRegression<B>) -> (Scalar<B>, LinearParams<B>) {
        (
            Scalar::new(0.0),
            LinearParams {
                weights: Tensor1D::zeros(model.params().weights.len()),
                bias: Scalar::new(0.0),
            },
        )
    }
}
