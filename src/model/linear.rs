//! Linear regression with compile-time state tracking.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: used during training.
//! - `LinearModel<Fitted>`: inference-only and serializable.
//!
//! The fitted model is free from training hyperparameters; the L2 penalty,
//! learning rate and stopping rule all live in the trainer.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::{FareError, Result};
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and bias of a linear model.
#[derive(Clone)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

/// Backend-free copy of [`LinearParams`], stored at full `f64` precision so a
/// reloaded model predicts bit-for-bit what the trained one did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias.to_f64(),
        }
    }
}

impl<B: Backend> TryFrom<SerializableLinearParams> for LinearParams<B> {
    type Error = FareError;

    fn try_from(value: SerializableLinearParams) -> Result<Self> {
        if !value.bias.is_finite() || value.weights.iter().any(|w| !w.is_finite()) {
            return Err(FareError::InvalidConfig(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            weights: Tensor1D::<B>::from_f64(value.weights),
            bias: Scalar::<B>::new(value.bias),
        })
    }
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }
}

/// Linear model `y = x·w + b`, parametrized by backend and training state.
#[derive(Clone)]
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> LinearModel<B, S> {
    /// Number of input features the model expects.
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias.to_f64()
    }
}

impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Tensor1D<B>) -> Scalar<B> {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Tensor2D<B>) -> Tensor1D<B> {
        input
            .dot(&self.params.weights)
            .add_scalar(&self.params.bias)
    }

    fn extract_params(&self) -> SerializableLinearParams {
        (&self.params).into()
    }

    fn from_params(params: SerializableLinearParams) -> Result<Self> {
        Ok(Self::new(LinearParams::<B>::try_from(params)?))
    }
}

impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Prediction = Tensor1D<B>;
    type Input = Tensor2D<B>;
    type Output = LinearModel<B, Fitted>;

    fn forward(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn params(&self) -> &LinearParams<B> {
        &self.params
    }

    fn update_params(&mut self, params: &LinearParams<B>) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }

    fn backward(&self, x: &Tensor2D<B>, grad_output: &Tensor1D<B>) -> LinearParams<B> {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }
}

pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Zero-initialized weights and bias.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LinearParams {
            weights: Tensor1D::<B>::zeros(n_features),
            bias: Scalar::<B>::new(0.),
        })
    }

    /// Starts with the bias at `bias` instead of zero, e.g. the mean label.
    pub fn with_bias(n_features: usize, bias: f64) -> Self {
        Self::from_params(LinearParams {
            weights: Tensor1D::<B>::zeros(n_features),
            bias: Scalar::<B>::new(bias),
        })
    }

    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn params(w: Vec<f32>, b: f64) -> LinearParams<CpuBackend> {
        LinearParams {
            weights: Tensor1D::new(w),
            bias: Scalar::new(b),
        }
    }

    #[test]
    fn test_param_ops_add() {
        let result = params(vec![1.0, 2.0], 0.5).add(&params(vec![0.5, 1.0], 0.5));
        assert_eq!(result.weights.to_vec(), vec![1.5, 3.0]);
        assert_eq!(result.bias.to_f64(), 1.0);
    }

    #[test]
    fn test_param_ops_scale() {
        let result = params(vec![2.0, 4.0], 1.0).scale(Scalar::new(-0.5));
        assert_eq!(result.weights.to_vec(), vec![-1.0, -2.0]);
        assert_eq!(result.bias.to_f64(), -0.5);
    }

    #[test]
    fn test_new_zero_initialized() {
        let model = LinearRegression::<CpuBackend>::new(3);
        assert_eq!(model.params().weights.to_vec(), vec![0.0; 3]);
        assert_eq!(model.params().bias.to_f64(), 0.0);
        assert_eq!(model.n_features(), 3);
    }

    #[test]
    fn test_with_bias() {
        let model = LinearRegression::<CpuBackend>::with_bias(2, 250.0);
        assert_eq!(model.params().bias.to_f64(), 250.0);
    }

    #[test]
    fn test_forward_one_hot_rows() {
        let model = LinearRegression::<CpuBackend>::from_params(params(vec![2.0, 3.0], 1.0));
        // [[1, 0], [0, 1]] -> [2 + 1, 3 + 1]
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
        assert_eq!(model.forward(&x).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_backward_batch() {
        let model = LinearRegression::<CpuBackend>::new(2);
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let grad_output = Tensor1D::<CpuBackend>::new(vec![0.5, 0.25]);

        let grads = model.backward(&x, &grad_output);

        // X^T @ g = [1*0.5 + 3*0.25, 2*0.5 + 4*0.25]
        assert!((grads.weights.to_vec()[0] - 1.25).abs() < 1e-10);
        assert!((grads.weights.to_vec()[1] - 2.0).abs() < 1e-10);
        assert!((grads.bias.to_f64() - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_update_params_and_into_fitted() {
        let mut model = LinearRegression::<CpuBackend>::new(2);
        model.update_params(&params(vec![1.0, 2.0], 0.5));
        let fitted = model.into_fitted();
        assert_eq!(fitted.weights(), vec![1.0, 2.0]);
        assert_eq!(fitted.bias(), 0.5);
    }

    #[test]
    fn test_fitted_predict_single_and_batch_agree() {
        let fitted = LinearModel::<CpuBackend, Fitted>::new(params(vec![10.0, 20.0, 30.0], 5.0));
        let single = fitted.predict(&Tensor1D::new(vec![0.0, 1.0, 0.0])).to_f64();
        assert_eq!(single, 25.0);

        let batch = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 2, 3);
        assert_eq!(fitted.predict_batch(&batch).to_vec(), vec![25.0, 45.0]);
    }

    #[test]
    fn test_params_round_trip_exact() {
        let fitted = LinearModel::<CpuBackend, Fitted>::new(LinearParams {
            weights: Tensor1D::from_f64(vec![0.1, 1.0 / 3.0]),
            bias: Scalar::new(std::f64::consts::PI),
        });
        let repr = fitted.extract_params();
        let restored = LinearModel::<CpuBackend, Fitted>::from_params(repr.clone()).unwrap();
        assert_eq!(restored.extract_params(), repr);
    }

    #[test]
    fn test_from_params_rejects_non_finite() {
        let bad = SerializableLinearParams {
            weights: vec![1.0, f64::NAN],
            bias: 0.0,
        };
        assert!(LinearModel::<CpuBackend, Fitted>::from_params(bad).is_err());
    }
}
