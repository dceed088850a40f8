//! Held-out evaluation of a fitted model.

mod metrics;

pub use metrics::{LossKind, RegressionMetrics};

use crate::error::{FareError, Result};
use crate::preprocessing::FeaturePipeline;
use crate::record::TravelRecord;
use crate::trainer::FarePredictor;
use std::fmt;
use tracing::{info, instrument};

/// Scores of a model on a held-out set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    pub r_squared: f64,
    pub mae: f64,
    pub rmse: f64,
    pub loss: f64,
    pub n_samples: usize,
    pub loss_kind: LossKind,
}

impl EvaluationReport {
    pub fn from_metrics(metrics: &RegressionMetrics, loss_kind: LossKind) -> Self {
        Self {
            r_squared: metrics.r_squared,
            mae: metrics.mae,
            rmse: metrics.rmse,
            loss: metrics.loss(loss_kind),
            n_samples: metrics.n_samples,
            loss_kind,
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model quality metrics ({} samples)", self.n_samples)?;
        writeln!(f, "  R^2:  {:.4}", self.r_squared)?;
        writeln!(f, "  MAE:  {:.2}", self.mae)?;
        writeln!(f, "  RMSE: {:.2}", self.rmse)?;
        write!(f, "  Loss ({}): {:.2}", self.loss_kind, self.loss)
    }
}

/// Encodes every record with `pipeline`, predicts with `model` and compares
/// against the recorded fare.
///
/// # Errors
/// - [`FareError::EmptyEvaluationSet`] for an empty `records`.
/// - [`FareError::EncoderNotFitted`] if `pipeline` was never fitted.
/// - [`FareError::FeatureMismatch`] if the pipeline and model widths differ.
/// - [`FareError::UnknownCategory`] under a strict unknown-category policy.
#[instrument(skip_all, fields(rows = records.len(), loss = %loss_kind))]
pub fn evaluate<P>(
    model: &P,
    pipeline: &FeaturePipeline,
    records: &[TravelRecord],
    loss_kind: LossKind,
) -> Result<EvaluationReport>
where
    P: FarePredictor + ?Sized,
{
    if records.is_empty() {
        return Err(FareError::EmptyEvaluationSet);
    }
    let width = pipeline.n_features_out()?;
    if width != model.n_features() {
        return Err(FareError::FeatureMismatch {
            expected_features: model.n_features(),
            got_features: width,
        });
    }

    let features = pipeline.encode_batch(records)?;
    let y_pred: Vec<f64> = features.iter().map(|x| model.predict(x)).collect();
    let y_true: Vec<f64> = records.iter().map(|r| r.fare).collect();

    let metrics = RegressionMetrics::from_predictions(&y_true, &y_pred)?;
    let report = EvaluationReport::from_metrics(&metrics, loss_kind);
    info!(
        r_squared = report.r_squared,
        mae = report.mae,
        rmse = report.rmse,
        loss = report.loss,
        "evaluation finished"
    );
    Ok(report)
}
