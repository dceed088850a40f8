//! Single-record inference against a trained model.

use crate::backend::CpuBackend;
use crate::error::{FareError, Result};
use crate::model::{Fitted, LinearModel};
use crate::persistence::ModelArchive;
use crate::preprocessing::FeaturePipeline;
use crate::record::{Column, TravelRecord};
use crate::trainer::FarePredictor;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A fitted pipeline paired with the model trained on its output.
///
/// Immutable once built; share it by reference across threads.
#[derive(Clone)]
pub struct PredictionEngine {
    pipeline: FeaturePipeline,
    model: LinearModel<CpuBackend, Fitted>,
}

impl PredictionEngine {
    /// # Errors
    /// - [`FareError::EncoderNotFitted`] if `pipeline` was never fitted.
    /// - [`FareError::FeatureMismatch`] if the widths disagree.
    pub fn new(pipeline: FeaturePipeline, model: LinearModel<CpuBackend, Fitted>) -> Result<Self> {
        let width = pipeline.n_features_out()?;
        if width != model.n_features() {
            return Err(FareError::FeatureMismatch {
                expected_features: model.n_features(),
                got_features: width,
            });
        }
        Ok(Self { pipeline, model })
    }

    /// Restores an engine from a model archive.
    ///
    /// # Errors
    /// [`FareError::ModelLoad`] if the archive cannot be read or rebuilt.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let archive = ModelArchive::load(path)?;
        archive
            .into_parts()
            .and_then(|(pipeline, model)| Self::new(pipeline, model))
            .map_err(|e| FareError::model_load(path, e.to_string()))
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn model(&self) -> &LinearModel<CpuBackend, Fitted> {
        &self.model
    }

    /// Column order the model was fitted with.
    pub fn columns(&self) -> &[Column] {
        self.pipeline.columns()
    }

    /// Predicted fare for `record`.
    ///
    /// # Errors
    /// [`FareError::UnknownCategory`] under a strict unknown-category policy.
    pub fn predict(&self, record: &TravelRecord) -> Result<f64> {
        let features = self.pipeline.encode(record)?;
        let predicted = FarePredictor::predict(&self.model, &features);
        debug!(predicted, "predicted fare");
        Ok(predicted)
    }

    /// Like [`predict`](Self::predict), but first checks that the caller's
    /// column set is the one the model was fitted with.
    ///
    /// # Errors
    /// [`FareError::StaleModel`] if `columns` differs in content or order.
    pub fn predict_with_columns(&self, columns: &[Column], record: &TravelRecord) -> Result<f64> {
        if columns != self.columns() {
            return Err(FareError::StaleModel {
                expected: Column::names(self.columns()),
                got: Column::names(columns),
            });
        }
        self.predict(record)
    }

    /// Prediction paired with the record's recorded fare.
    pub fn outcome(&self, record: &TravelRecord) -> Result<PredictionOutcome> {
        Ok(PredictionOutcome {
            predicted: self.predict(record)?,
            actual: record.fare,
        })
    }
}

/// Predicted fare next to the known one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionOutcome {
    pub predicted: f64,
    pub actual: f64,
}

impl fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predicted fare: {:.2}, actual fare: {:.2}",
            self.predicted, self.actual
        )
    }
}
