use crate::backend::{Backend, Scalar};
use crate::model::LinearParams;

/// Parameter update rule.
pub trait Optimizer<B: Backend, P> {
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain stochastic gradient descent: `p <- p - lr * g`.
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend> Optimizer<B, LinearParams<B>> for SGD<B> {
    fn step(&self, params: &LinearParams<B>, grads: &LinearParams<B>) -> LinearParams<B> {
        // One scale + add instead of scale + subtract.
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        let weights = params.weights.add(&grads.weights.scale(&neg_lr));
        let bias = params.bias - grads.bias * self.lr;

        LinearParams { weights, bias }
    }
}
