//! On-disk model archive.
//!
//! ```text
//! +-------------------+
//! | Magic (4 bytes)   |  "FARE"
//! +-------------------+
//! | Version (4 bytes) |  u32 little-endian
//! +-------------------+
//! | Payload           |  bincode: encoder params, linear params, metadata
//! +-------------------+
//! ```
//!
//! Saving goes through a sibling temporary file that is renamed onto the
//! target only after it has been flushed and synced, so a failed save never
//! leaves a truncated archive behind.

use crate::backend::CpuBackend;
use crate::error::{FareError, Result};
use crate::filter::FareRange;
use crate::model::{Fitted, InferenceModel, LinearModel, SerializableLinearParams};
use crate::preprocessing::{FeaturePipeline, FittedOneHotEncoder, FittedTransformer, OneHotEncoderParams};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Leading bytes of every archive.
pub const ARCHIVE_MAGIC: &[u8; 4] = b"FARE";

/// Payload layout version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const HEADER_SIZE: usize = 8;

/// How the archived model was trained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub fare_range: FareRange,
    pub training_rows: usize,
}

/// Everything needed to predict with a trained model: encoder vocabularies in
/// column order plus the linear parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArchive {
    pub encoder: OneHotEncoderParams,
    pub model: SerializableLinearParams,
    pub metadata: TrainingMetadata,
}

impl ModelArchive {
    /// Captures a fitted pipeline and model.
    ///
    /// # Errors
    /// - [`FareError::EncoderNotFitted`] if `pipeline` has not been fitted.
    /// - [`FareError::FeatureMismatch`] if the model width differs from the
    ///   pipeline's output width.
    pub fn new(
        pipeline: &FeaturePipeline,
        model: &LinearModel<CpuBackend, Fitted>,
        metadata: TrainingMetadata,
    ) -> Result<Self> {
        let fitted = pipeline.fitted()?;
        if fitted.n_features_out() != model.n_features() {
            return Err(FareError::FeatureMismatch {
                expected_features: fitted.n_features_out(),
                got_features: model.n_features(),
            });
        }
        Ok(Self {
            encoder: fitted.extract_params(),
            model: model.extract_params(),
            metadata,
        })
    }

    /// Rebuilds the fitted pipeline and model.
    ///
    /// # Errors
    /// Propagates validation failures of the stored parameters.
    pub fn into_parts(self) -> Result<(FeaturePipeline, LinearModel<CpuBackend, Fitted>)> {
        let encoder = FittedOneHotEncoder::from_params(self.encoder)?;
        let model = LinearModel::<CpuBackend, Fitted>::from_params(self.model)?;
        Ok((FeaturePipeline::from_fitted(encoder), model))
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        let columns = self.encoder.columns.len();
        let vocabularies = self.encoder.categories.len();
        if columns != vocabularies {
            return Err(format!(
                "archive holds {vocabularies} vocabularies for {columns} columns"
            ));
        }
        let width: usize = self.encoder.categories.iter().map(Vec::len).sum();
        if self.model.weights.len() != width {
            return Err(format!(
                "archive holds {} weights but vocabularies span {width} features",
                self.model.weights.len()
            ));
        }
        Ok(())
    }

    /// Writes the archive to `path` atomically.
    ///
    /// # Errors
    /// - [`FareError::Serialization`] if the payload cannot be encoded.
    /// - [`FareError::Io`] for any filesystem failure; the temporary file is
    ///   removed and `path` is left untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let payload = self.to_bytes()?;
        let tmp = temp_path(path);

        let written = (|| -> std::io::Result<()> {
            let file = File::create(&tmp)?;
            {
                let mut writer = BufWriter::new(&file);
                writer.write_all(ARCHIVE_MAGIC)?;
                writer.write_all(&SCHEMA_VERSION.to_le_bytes())?;
                writer.write_all(&payload)?;
                writer.flush()?;
            }
            file.sync_all()?;
            fs::rename(&tmp, path)
        })();

        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(FareError::io(path, err));
        }
        info!(path = %path.display(), bytes = payload.len() + HEADER_SIZE, "saved model archive");
        Ok(())
    }

    /// Reads and validates an archive.
    ///
    /// # Errors
    /// [`FareError::ModelLoad`] for a missing or unreadable file, wrong magic,
    /// unsupported version, undecodable payload or an archive whose weights do
    /// not match its vocabularies.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| FareError::model_load(path, e.to_string()))?;

        if bytes.len() < HEADER_SIZE {
            return Err(FareError::model_load(path, "file shorter than archive header"));
        }
        if &bytes[..4] != ARCHIVE_MAGIC {
            return Err(FareError::model_load(path, "not a model archive (bad magic)"));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..HEADER_SIZE]);
        let version = u32::from_le_bytes(version);
        if version != SCHEMA_VERSION {
            return Err(FareError::model_load(
                path,
                format!("unsupported schema version {version}, expected {SCHEMA_VERSION}"),
            ));
        }

        let archive = Self::from_bytes(&bytes[HEADER_SIZE..])
            .map_err(|e| FareError::model_load(path, format!("corrupt payload: {e}")))?;
        archive
            .check_consistency()
            .map_err(|reason| FareError::model_load(path, reason))?;
        debug!(
            path = %path.display(),
            columns = archive.encoder.columns.len(),
            features = archive.model.weights.len(),
            "loaded model archive"
        );
        Ok(archive)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
