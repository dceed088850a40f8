//! Trainable and inference model abstractions.
//!
//! A model goes through two compile-time states (see [`state`]): while
//! `Unfitted` it implements [`TrainableModel`] and is driven by the
//! [`Trainer`](crate::trainer::Trainer); `into_fitted` turns it into an
//! inference-only model implementing [`InferenceModel`], which holds no
//! training hyperparameters and can be persisted through its parameter
//! representation.

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

use crate::backend::{Backend, Scalar};
use crate::error::Result;
use crate::serialization::SerializableParams;

/// A model in its training state.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    /// Forward pass over a batch.
    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Parameter gradients given `∂L/∂prediction`.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    /// Drops training state and returns the inference model.
    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic on parameter sets, used to combine loss and penalty gradients.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

/// A fitted model ready for prediction.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Backend-free parameter representation.
    type ParamsRepr: SerializableParams;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;
}
