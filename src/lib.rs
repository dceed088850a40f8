//! # farecast
//!
//! Airfare regression over tabular travel records: CSV ingestion, fare
//! outlier filtering, one-hot encoding of categorical columns, linear model
//! training, held-out evaluation, model persistence and single-record
//! prediction.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models and encoders carry their training state
//!   in the type system (`Unfitted` vs `Fitted`, `OneHotEncoder` vs
//!   `FittedOneHotEncoder`).
//! - **Write-once vocabularies**: a [`FeaturePipeline`] is fitted on training
//!   records exactly once; evaluation and prediction reuse it read-only.
//! - **Training/Inference Separation**: fitted models hold only prediction
//!   parameters; loss, optimizer, regularizer and stopping rule live in the
//!   [`trainer`].
//!
//! ## Quick Start
//!
//! ```rust
//! use farecast::preprocessing::{FeaturePipeline, HandleUnknown};
//! use farecast::record::{Column, TravelRecord};
//! use farecast::trainer::{FarePredictor, LinearRegressionTrainer, Regressor, TrainerConfig};
//!
//! let trip = |airline: &str, fare: f64| {
//!     TravelRecord::from_fields(
//!         ["18/12/2019", "ZQN", "10:20 AM", "WLG", "6:10 PM", "7h 50m", "(1 stop)", "", "", airline],
//!         fare,
//!     )
//! };
//! let train = vec![trip("Jetstar", 150.0), trip("Air New Zealand", 422.0)];
//!
//! let pipeline = FeaturePipeline::new(vec![Column::Airline], HandleUnknown::Ignore).unwrap();
//! pipeline.fit(&train).unwrap();
//! let x = pipeline.encode_batch(&train).unwrap();
//! let y: Vec<f64> = train.iter().map(|r| r.fare).collect();
//!
//! let trainer = LinearRegressionTrainer::new(TrainerConfig::default().max_epochs(2000)).unwrap();
//! let model = trainer.train(&x, &y).unwrap();
//! let fare = model.predict(&pipeline.encode(&trip("Air New Zealand", 0.0)).unwrap());
//! assert!(fare.is_finite());
//! ```
//!
//! ## Module Structure
//!
//! - `record`: the fixed eleven-column travel schema
//! - `dataset`: CSV ingestion and in-memory training datasets
//! - `filter`: fare outlier filtering
//! - `preprocessing`: vocabularies, one-hot encoder, assembler, pipeline
//! - `backend`, `model`, `loss`, `optimizer`, `regularizers`, `trainer`:
//!   the linear regression training stack
//! - `evaluation`: R², MAE, RMSE and loss on a held-out set
//! - `persistence`, `prediction`: model archive and inference engine
//! - `config`, `app`: run configuration and the end-to-end flows

/// Tensor abstractions and computation primitives.
pub mod backend;

/// Application flows: train, evaluate, predict.
pub mod app;

/// Run configuration loaded from JSON.
pub mod config;

/// CSV ingestion and dataset abstractions.
pub mod dataset;

/// Crate error type.
pub mod error;

/// Held-out evaluation.
pub mod evaluation;

/// Fare outlier filtering.
pub mod filter;

/// Differentiable loss functions for model training.
pub mod loss;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Model archive format.
pub mod persistence;

/// Single-record inference.
pub mod prediction;

/// Turning records into feature vectors.
pub mod preprocessing;

/// Travel record schema.
pub mod record;

/// Weight regularization strategies.
pub mod regularizers;

/// Byte serialization of fitted parameters.
pub mod serialization;

/// Training loop and the regressor seam.
pub mod trainer;

pub use backend::{Backend, CpuBackend, ScalarOps, Tensor1D, Tensor2D};
pub use config::PipelineConfig;
pub use error::{FareError, Result};
pub use evaluation::{EvaluationReport, LossKind};
pub use filter::FareRange;
pub use prediction::{PredictionEngine, PredictionOutcome};
pub use preprocessing::{EncodedFeatureVector, FeaturePipeline, HandleUnknown};
pub use record::{Column, TravelRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::{Loss, MSELoss};
    use crate::model::{InferenceModel, LinearRegression, TrainableModel};
    use crate::optimizer::{Optimizer, SGD};

    fn col_to_tensor2d<B: Backend>(col: &[f32]) -> Tensor2D<B> {
        Tensor2D::<B>::new(col.to_vec(), col.len(), 1)
    }

    #[test]
    fn test_manual_training_loop() {
        // y = x
        let x = col_to_tensor2d::<CpuBackend>(&[1.0, 2.0, 3.0, 4.0]);
        let y = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0]);

        let mut model = LinearRegression::<CpuBackend>::new(1);
        let optimizer = SGD::new(0.05);
        for _ in 0..2000 {
            let pred = model.forward(&x);
            let grad = MSELoss.grad_wrt_prediction(&pred, &y);
            let grads = model.backward(&x, &grad);
            let new_params = optimizer.step(model.params(), &grads);
            model.update_params(&new_params);
        }
        let final_loss = MSELoss.loss(&model.forward(&x), &y).to_f64();
        assert!(final_loss < 1e-4, "{final_loss}");

        let fitted = model.into_fitted();
        let pred = fitted.predict(&Tensor1D::new(vec![2.5])).to_f64();
        assert!((pred - 2.5).abs() < 0.05, "{pred}");
    }
}
