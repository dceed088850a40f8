//! Training loop and the regressor seam.
//!
//! [`Trainer`] is the generic mini-batch gradient-descent loop over any
//! [`Dataset`], combining a [`Loss`], an [`Optimizer`] and a [`Regularizer`].
//! The rest of the crate does not depend on it directly: it talks to a
//! [`Regressor`] that turns encoded features into a [`FarePredictor`], and
//! [`LinearRegressionTrainer`] is the implementation shipped here.

mod regressor;

pub use regressor::{FarePredictor, LinearRegressionTrainer, Regressor, TrainerConfig};

use crate::{
    backend::{Backend, Tensor1D, Tensor2D},
    dataset::Dataset,
    error::{FareError, Result},
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
    regularizers::Regularizer,
};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Mini-batch gradient descent driver.
pub struct Trainer<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) tolerance: f64,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    pub(crate) regularizer: R,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

pub struct TrainerBuilder<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    batch_size: usize,
    max_epochs: usize,
    tolerance: f64,
    loss_fn: L,
    optimizer: O,
    regularizer: R,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P, R> TrainerBuilder<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    pub fn new(loss_fn: L, optimizer: O, regularizer: R) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            tolerance: 0.0,
            loss_fn,
            optimizer,
            regularizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Stop once the relative change of the epoch loss drops to `tol` or
    /// below. `0.0` disables early stopping.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P, R> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            tolerance: self.tolerance,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            regularizer: self.regularizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P, R> Trainer<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = L::Prediction,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
    P: ParamOps<B>,
{
    /// Trains `model` on `dataset` and returns the fitted model.
    ///
    /// # Errors
    /// - [`FareError::InvalidConfig`] for a zero batch size.
    /// - [`FareError::EmptyData`] for an empty dataset.
    /// - [`FareError::Training`] if the dataset length is unknown, a batch
    ///   cannot be loaded, or the loss stops being finite.
    pub fn fit<D>(&self, mut model: M, dataset: &D) -> Result<M::Output>
    where
        D: Dataset,
    {
        if self.batch_size == 0 {
            return Err(FareError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        let n_total = dataset
            .len()
            .ok_or_else(|| FareError::Training("dataset length unknown".to_string()))?;
        if n_total == 0 {
            return Err(FareError::EmptyData("dataset is empty".to_string()));
        }

        let mut previous: Option<f64> = None;
        let mut last_loss = f64::NAN;
        let mut epochs_run = 0;
        for epoch in 0..self.max_epochs {
            let mut weighted_loss = 0.0;
            for batch_result in dataset.batches::<B>(self.batch_size) {
                let (batch_x, batch_y) = batch_result
                    .map_err(|e| FareError::Training(format!("data error: {e:?}")))?;
                let preds = model.forward(&batch_x);
                let (reg_penalty, reg_grad) = self.regularizer.regularizer_penalty_grad(&model);
                let batch_loss = self.loss_fn.loss(&preds, &batch_y) + reg_penalty;
                weighted_loss += batch_loss.to_f64() * batch_y.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds).add(&reg_grad);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let avg_loss = weighted_loss / n_total as f64;
            epochs_run = epoch + 1;
            debug!(epoch, loss = avg_loss, "epoch finished");
            if !avg_loss.is_finite() {
                return Err(FareError::Training(format!(
                    "loss is not finite after epoch {epoch}; lower the learning rate"
                )));
            }
            last_loss = avg_loss;

            if let Some(prev) = previous {
                if (prev - avg_loss).abs() <= self.tolerance * prev.abs().max(1.0) {
                    debug!(epoch, "epoch loss converged");
                    break;
                }
            }
            previous = Some(avg_loss);
        }

        info!(epochs = epochs_run, loss = last_loss, rows = n_total, "training finished");
        Ok(model.into_fitted())
    }
}

impl<B, L, O, M, P, R> Trainer<B, L, O, M, P, R>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    R: Regularizer<B, M>,
{
    pub fn builder(loss_fn: L, optimizer: O, regularizer: R) -> TrainerBuilder<B, L, O, M, P, R> {
        TrainerBuilder::new(loss_fn, optimizer, regularizer)
    }
}
