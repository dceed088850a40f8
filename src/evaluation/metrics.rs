use crate::error::{FareError, Result};
use serde::{Deserialize, Serialize};

/// Which error the evaluator reports as its loss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    /// Mean squared error.
    #[default]
    Squared,
    /// Mean absolute error.
    Absolute,
}

impl std::fmt::Display for LossKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossKind::Squared => f.write_str("squared"),
            LossKind::Absolute => f.write_str("absolute"),
        }
    }
}

/// Regression metrics over one scored set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Scores `y_pred` against `y_true`.
    ///
    /// R² = 1 - SS_res / SS_tot. When every label is equal (`SS_tot = 0`)
    /// R² is 1 for a perfect fit and 0 otherwise.
    ///
    /// # Errors
    /// [`FareError::EmptyEvaluationSet`] when there are no samples.
    ///
    /// # Panics
    /// If the slices differ in length.
    pub fn from_predictions(y_true: &[f64], y_pred: &[f64]) -> Result<Self> {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );
        if y_true.is_empty() {
            return Err(FareError::EmptyEvaluationSet);
        }

        let n = y_true.len() as f64;
        let mean_true = y_true.iter().sum::<f64>() / n;

        let (ss_res, sum_abs) = y_true
            .iter()
            .zip(y_pred)
            .fold((0.0, 0.0), |(sq, ab), (&t, &p)| {
                (sq + (t - p).powi(2), ab + (t - p).abs())
            });
        let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

        let r_squared = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };
        let mse = ss_res / n;

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: sum_abs / n,
            r_squared,
            n_samples: y_true.len(),
        })
    }

    /// The loss selected by `kind`.
    pub fn loss(&self, kind: LossKind) -> f64 {
        match kind {
            LossKind::Squared => self.mse,
            LossKind::Absolute => self.mae,
        }
    }
}
