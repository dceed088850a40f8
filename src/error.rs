//! Error types for the fare pipeline.
//!
//! Every fallible operation in the crate returns [`FareError`]. All variants are
//! fatal to the operation that raised them; nothing is retried internally.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FareError>;

/// Error type for ingestion, encoding, training, evaluation and persistence.
#[derive(Debug, Error)]
pub enum FareError {
    /// A CSV row had the wrong number of fields.
    #[error("malformed row in {source_name} at line {line}: expected {expected} columns, got {got}")]
    MalformedRow {
        source_name: String,
        line: u64,
        expected: usize,
        got: usize,
    },

    /// A field could not be parsed into its typed form.
    #[error("cannot parse {column} in {source_name} at line {line} from {value:?}: {reason}")]
    FieldParse {
        source_name: String,
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    /// `encode` was called on a pipeline that has not been fitted.
    #[error("feature encoder used before fit")]
    EncoderNotFitted,

    /// `fit` was called on a pipeline whose vocabularies are already fixed.
    #[error("feature encoder is already fitted; vocabularies are write-once")]
    EncoderAlreadyFitted,

    /// An unseen category reached an encoder configured to reject them.
    #[error("unknown category {value:?} in column {column}")]
    UnknownCategory { column: String, value: String },

    /// Evaluation was requested over zero records.
    #[error("cannot evaluate on an empty held-out set")]
    EmptyEvaluationSet,

    /// The caller's column set differs from the one the model was fitted with.
    #[error("stale model: fitted with columns [{}], got [{}]", expected.join(", "), got.join(", "))]
    StaleModel { expected: Vec<String>, got: Vec<String> },

    /// A persisted archive is unreadable, corrupt or incompatible.
    #[error("cannot load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    /// A configuration value is out of its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty data was provided where at least one row is required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Feature dimension mismatch.
    #[error("feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// The training loop could not complete (data access failure, divergence).
    #[error("training failed: {0}")]
    Training(String),

    /// I/O failure on a named path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Low-level CSV reader failure (encoding, I/O inside the reader).
    #[error("CSV error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FareError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        FareError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn model_load(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        FareError::ModelLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }
}

impl From<bincode::Error> for FareError {
    fn from(err: bincode::Error) -> Self {
        FareError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for FareError {
    fn from(err: serde_json::Error) -> Self {
        FareError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_row() {
        let err = FareError::MalformedRow {
            source_name: "train.csv".to_string(),
            line: 7,
            expected: 11,
            got: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("train.csv"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("expected 11"));
        assert!(msg.contains("got 9"));
    }

    #[test]
    fn test_error_display_field_parse() {
        let err = FareError::FieldParse {
            source_name: "test.csv".to_string(),
            line: 3,
            column: "AirFare".to_string(),
            value: "abc".to_string(),
            reason: "invalid float literal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("AirFare"));
        assert!(msg.contains("\"abc\""));
    }

    #[test]
    fn test_error_display_stale_model() {
        let err = FareError::StaleModel {
            expected: vec!["Airline".to_string(), "Direct".to_string()],
            got: vec!["Direct".to_string()],
        };
        assert!(err.to_string().contains("[Airline, Direct]"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = FareError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("feature mismatch"));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: std::result::Result<String, bincode::Error> =
            bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: FareError = e.into();
            assert!(matches!(err, FareError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_io_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = FareError::io("/tmp/missing.csv", io_err);
        assert!(err.to_string().contains("/tmp/missing.csv"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FareError>();
    }
}
