//! End-to-end flows used by the `farecast` binary.

use crate::config::PipelineConfig;
use crate::dataset::read_all;
use crate::error::{FareError, Result};
use crate::evaluation::{evaluate, EvaluationReport};
use crate::filter::filter_outliers;
use crate::persistence::{ModelArchive, TrainingMetadata};
use crate::prediction::{PredictionEngine, PredictionOutcome};
use crate::preprocessing::FeaturePipeline;
use crate::record::{Column, TravelRecord};
use crate::trainer::{LinearRegressionTrainer, Regressor};
use tracing::{info, instrument};

/// Result of [`train_and_evaluate`].
pub struct TrainingOutcome {
    pub report: EvaluationReport,
    pub engine: PredictionEngine,
    /// Training rows left after outlier filtering.
    pub training_rows: usize,
    pub dropped_rows: usize,
}

/// Reads the training CSV, drops fare outliers, fits the feature pipeline,
/// trains, scores the held-out CSV and saves the archive to
/// `config.model_path`.
///
/// The held-out set is scored as read, without outlier filtering.
#[instrument(skip_all, fields(train = %config.train_path.display(), test = %config.test_path.display()))]
pub fn train_and_evaluate(config: &PipelineConfig) -> Result<TrainingOutcome> {
    config.validate()?;
    let delimiter = config.delimiter_byte()?;

    let raw = read_all(&config.train_path, delimiter)?;
    let read_rows = raw.len();
    let train = filter_outliers(raw, &config.fare_range);
    if train.is_empty() {
        return Err(FareError::EmptyData(format!(
            "no training rows of {} remain inside {}..={}",
            config.train_path.display(),
            config.fare_range.lower(),
            config.fare_range.upper()
        )));
    }

    let pipeline = FeaturePipeline::new(config.columns.clone(), config.handle_unknown)?;
    pipeline.fit(&train)?;
    let features = pipeline.encode_batch(&train)?;
    let labels: Vec<f64> = train.iter().map(|r| r.fare).collect();

    let trainer = LinearRegressionTrainer::new(config.trainer.clone())?;
    let model = trainer.train(&features, &labels)?;

    let test = read_all(&config.test_path, delimiter)?;
    let report = evaluate(&model, &pipeline, &test, config.loss)?;

    let metadata = TrainingMetadata {
        fare_range: config.fare_range,
        training_rows: train.len(),
    };
    let archive = ModelArchive::new(&pipeline, &model, metadata)?;
    info!(
        training_rows = train.len(),
        r_squared = report.r_squared,
        rmse = report.rmse,
        "model trained"
    );
    if let Some(dir) = config.model_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| FareError::io(dir, e))?;
    }
    archive.save(&config.model_path)?;

    Ok(TrainingOutcome {
        report,
        engine: PredictionEngine::new(pipeline, model)?,
        training_rows: train.len(),
        dropped_rows: read_rows - train.len(),
    })
}

/// Scores the archive at `config.model_path` on `config.test_path`.
#[instrument(skip_all, fields(model = %config.model_path.display(), test = %config.test_path.display()))]
pub fn evaluate_saved(config: &PipelineConfig) -> Result<EvaluationReport> {
    config.validate()?;
    let engine = PredictionEngine::load(&config.model_path)?;
    if engine.columns() != config.columns.as_slice() {
        return Err(FareError::StaleModel {
            expected: Column::names(engine.columns()),
            got: Column::names(&config.columns),
        });
    }
    let test = read_all(&config.test_path, config.delimiter_byte()?)?;
    evaluate(engine.model(), engine.pipeline(), &test, config.loss)
}

/// Loads the archive at `config.model_path` and prices `record`.
///
/// # Errors
/// [`FareError::StaleModel`] if the archive was fitted on columns other than
/// `config.columns`.
#[instrument(skip_all, fields(model = %config.model_path.display()))]
pub fn predict_sample(config: &PipelineConfig, record: &TravelRecord) -> Result<PredictionOutcome> {
    let engine = PredictionEngine::load(&config.model_path)?;
    let outcome = PredictionOutcome {
        predicted: engine.predict_with_columns(&config.columns, record)?,
        actual: record.fare,
    };
    info!(predicted = outcome.predicted, actual = outcome.actual, "sample prediction");
    Ok(outcome)
}

/// The reference trip `ZQN -> WLG` on Air New Zealand, known fare 422.
pub fn sample_record() -> TravelRecord {
    TravelRecord::from_fields(
        [
            "18/12/2019",
            "ZQN",
            "10:20 AM",
            "WLG",
            "6:10 PM",
            "7h 50m",
            "(1 stop)",
            "4h 50m in AKL",
            "",
            "Air New Zealand",
        ],
        422.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_record_fields() {
        let r = sample_record();
        assert_eq!(r.departure_airport, "ZQN");
        assert_eq!(r.arrival_airport, "WLG");
        assert_eq!(r.transit, "4h 50m in AKL");
        assert_eq!(r.baggage, "");
        assert_eq!(r.fare, 422.0);
        assert_eq!(r.duration_minutes().unwrap(), 470);
    }

    #[test]
    fn test_train_rejects_invalid_config() {
        let config = PipelineConfig::default().columns(vec![]);
        assert!(matches!(
            train_and_evaluate(&config),
            Err(FareError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_train_missing_file() {
        let config = PipelineConfig::default().train_path("/definitely/not/here.csv");
        assert!(matches!(train_and_evaluate(&config), Err(FareError::Io { .. })));
    }
}
