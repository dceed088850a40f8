use super::Trainer;
use crate::backend::{Backend, CpuBackend, Tensor1D};
use crate::dataset::EncodedDataset;
use crate::error::{FareError, Result};
use crate::loss::MSELoss;
use crate::model::{Fitted, InferenceModel, LinearModel, LinearRegression};
use crate::optimizer::SGD;
use crate::preprocessing::EncodedFeatureVector;
use crate::regularizers::{NoRegularizer, Regularizer, L2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A fitted regressor that prices one encoded trip.
pub trait FarePredictor: Send + Sync {
    /// Feature width the predictor was trained on.
    fn n_features(&self) -> usize;

    /// Predicted fare.
    ///
    /// # Panics
    /// If `features.len() != self.n_features()`; callers check widths first.
    fn predict(&self, features: &EncodedFeatureVector) -> f64;
}

/// Anything that can learn a [`FarePredictor`] from encoded features.
pub trait Regressor {
    type Model: FarePredictor;

    /// # Errors
    /// - [`FareError::EmptyData`] when there are no rows.
    /// - [`FareError::FeatureMismatch`] for mismatched lengths or ragged rows.
    fn train(&self, features: &[EncodedFeatureVector], labels: &[f64]) -> Result<Self::Model>;
}

impl<B: Backend> FarePredictor for LinearModel<B, Fitted> {
    fn n_features(&self) -> usize {
        LinearModel::n_features(self)
    }

    fn predict(&self, features: &EncodedFeatureVector) -> f64 {
        let x = Tensor1D::<B>::new(features.as_slice().to_vec());
        InferenceModel::predict(self, &x).to_f64()
    }
}

fn default_learning_rate() -> f64 {
    0.1
}
fn default_l2() -> f64 {
    1e-3
}
fn default_batch_size() -> usize {
    32
}
fn default_max_epochs() -> usize {
    300
}
fn default_tolerance() -> f64 {
    1e-6
}

/// Hyperparameters of [`LinearRegressionTrainer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// L2 strength; `0` trains without a penalty.
    #[serde(default = "default_l2")]
    pub l2: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_epochs")]
    pub max_epochs: usize,
    /// Relative epoch-loss change at which training stops.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            l2: default_l2(),
            batch_size: default_batch_size(),
            max_epochs: default_max_epochs(),
            tolerance: default_tolerance(),
        }
    }
}

impl TrainerConfig {
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn l2(mut self, lambda: f64) -> Self {
        self.l2 = lambda;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// # Errors
    /// [`FareError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(FareError::InvalidConfig(msg));
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return bad(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return bad(format!("l2 must be non-negative, got {}", self.l2));
        }
        if self.batch_size == 0 {
            return bad("batch_size must be positive".to_string());
        }
        if self.max_epochs == 0 {
            return bad("max_epochs must be positive".to_string());
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return bad(format!("tolerance must be non-negative, got {}", self.tolerance));
        }
        Ok(())
    }
}

/// Ridge-regularized linear regression trained by mini-batch SGD on the CPU
/// backend. The bias starts at the mean label so training only has to learn
/// per-category offsets.
#[derive(Clone, Debug, Default)]
pub struct LinearRegressionTrainer {
    config: TrainerConfig,
}

impl LinearRegressionTrainer {
    /// # Errors
    /// [`FareError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    fn run<R>(
        &self,
        regularizer: R,
        dataset: &EncodedDataset,
        initial_bias: f64,
    ) -> Result<LinearModel<CpuBackend, Fitted>>
    where
        R: Regularizer<CpuBackend, LinearRegression<CpuBackend>>,
    {
        let trainer = Trainer::builder(MSELoss, SGD::new(self.config.learning_rate), regularizer)
            .batch_size(self.config.batch_size)
            .max_epochs(self.config.max_epochs)
            .tolerance(self.config.tolerance)
            .build();
        let model = LinearRegression::<CpuBackend>::with_bias(dataset.n_features(), initial_bias);
        trainer.fit(model, dataset)
    }
}

impl Regressor for LinearRegressionTrainer {
    type Model = LinearModel<CpuBackend, Fitted>;

    fn train(&self, features: &[EncodedFeatureVector], labels: &[f64]) -> Result<Self::Model> {
        let dataset = EncodedDataset::new(features.to_vec(), labels.to_vec())?;
        let mean_label = labels.iter().sum::<f64>() / labels.len() as f64;
        info!(
            rows = labels.len(),
            features = dataset.n_features(),
            learning_rate = self.config.learning_rate,
            l2 = self.config.l2,
            "training linear regression"
        );

        if self.config.l2 > 0.0 {
            self.run(L2::<CpuBackend>::new(self.config.l2), &dataset, mean_label)
        } else {
            self.run(NoRegularizer, &dataset, mean_label)
        }
    }
}
