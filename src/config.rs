//! Pipeline configuration.
//!
//! Loaded from a JSON file; every key is optional and falls back to its
//! default. Paths can be overridden afterwards with the builder setters.

use crate::error::{FareError, Result};
use crate::evaluation::LossKind;
use crate::filter::FareRange;
use crate::preprocessing::encoding::validate_columns;
use crate::preprocessing::HandleUnknown;
use crate::record::Column;
use crate::trainer::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_train_path() -> PathBuf {
    PathBuf::from("data/nz-airfares-train.csv")
}

fn default_test_path() -> PathBuf {
    PathBuf::from("data/nz-airfares-test.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/air-travel-fare.model")
}

fn default_delimiter() -> char {
    ','
}

fn default_columns() -> Vec<Column> {
    Column::DEFAULT_ENCODED.to_vec()
}

/// Everything a train/evaluate/predict run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_train_path")]
    pub train_path: PathBuf,
    #[serde(default = "default_test_path")]
    pub test_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Single ASCII field separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// One-hot encoded columns, in feature order.
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub fare_range: FareRange,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    #[serde(default)]
    pub loss: LossKind,
    #[serde(default)]
    pub trainer: TrainerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_path: default_train_path(),
            test_path: default_test_path(),
            model_path: default_model_path(),
            delimiter: default_delimiter(),
            columns: default_columns(),
            fare_range: FareRange::default(),
            handle_unknown: HandleUnknown::default(),
            loss: LossKind::default(),
            trainer: TrainerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config file and validates it.
    ///
    /// # Errors
    /// - [`FareError::Io`] if the file cannot be read.
    /// - [`FareError::Serialization`] for malformed JSON or an invalid
    ///   fare range.
    /// - [`FareError::InvalidConfig`] if validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FareError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// [`FareError::InvalidConfig`] for empty or duplicated columns, a
    /// non-ASCII delimiter or invalid trainer settings.
    pub fn validate(&self) -> Result<()> {
        validate_columns(&self.columns)?;
        self.delimiter_byte()?;
        FareRange::new(self.fare_range.lower(), self.fare_range.upper())?;
        self.trainer.validate()
    }

    /// The delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(FareError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }

    pub fn train_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.train_path = path.into();
        self
    }

    pub fn test_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_path = path.into();
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn fare_range(mut self, range: FareRange) -> Self {
        self.fare_range = range;
        self
    }

    pub fn handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn loss(mut self, loss: LossKind) -> Self {
        self.loss = loss;
        self
    }

    pub fn trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = trainer;
        self
    }
}
