//! Write-once feature pipeline: one-hot encoder followed by the assembler.

use crate::error::{FareError, Result};
use crate::preprocessing::assembler::EncodedFeatureVector;
use crate::preprocessing::encoding::{
    validate_columns, FittedOneHotEncoder, HandleUnknown, OneHotEncoder, Vocabulary,
};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::record::{Column, TravelRecord};
use std::sync::OnceLock;
use tracing::debug;

/// Ordered column encoding fixed at construction and fitted exactly once.
///
/// The pipeline is shared by reference between training, evaluation and
/// prediction; once fitted, its vocabularies can never change.
#[derive(Clone, Debug)]
pub struct FeaturePipeline {
    encoder: OneHotEncoder,
    fitted: OnceLock<FittedOneHotEncoder>,
}

impl FeaturePipeline {
    /// # Errors
    /// [`FareError::InvalidConfig`] for an empty or duplicated column list.
    pub fn new(columns: Vec<Column>, handle_unknown: HandleUnknown) -> Result<Self> {
        validate_columns(&columns)?;
        Ok(Self {
            encoder: OneHotEncoder::new(columns).with_handle_unknown(handle_unknown),
            fitted: OnceLock::new(),
        })
    }

    /// Wraps an already fitted encoder, e.g. one restored from an archive.
    pub fn from_fitted(fitted: FittedOneHotEncoder) -> Self {
        let encoder =
            OneHotEncoder::new(fitted.columns().to_vec()).with_handle_unknown(fitted.handle_unknown());
        Self {
            encoder,
            fitted: OnceLock::from(fitted),
        }
    }

    /// Learns the vocabularies from `records`.
    ///
    /// # Errors
    /// - [`FareError::EncoderAlreadyFitted`] on any call after a successful fit.
    /// - [`FareError::EmptyData`] when `records` is empty.
    pub fn fit(&self, records: &[TravelRecord]) -> Result<()> {
        if self.fitted.get().is_some() {
            return Err(FareError::EncoderAlreadyFitted);
        }
        let fitted = self.encoder.fit(records)?;
        debug!(
            rows = records.len(),
            features = fitted.n_features_out(),
            "fitted feature pipeline"
        );
        self.fitted
            .set(fitted)
            .map_err(|_| FareError::EncoderAlreadyFitted)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.get().is_some()
    }

    /// The fitted encoder.
    ///
    /// # Errors
    /// [`FareError::EncoderNotFitted`] before [`fit`](Self::fit).
    pub fn fitted(&self) -> Result<&FittedOneHotEncoder> {
        self.fitted.get().ok_or(FareError::EncoderNotFitted)
    }

    /// Encodes one record.
    pub fn encode(&self, record: &TravelRecord) -> Result<EncodedFeatureVector> {
        self.fitted()?.transform(record)
    }

    /// Encodes every record, one row per record.
    pub fn encode_batch(&self, records: &[TravelRecord]) -> Result<Vec<EncodedFeatureVector>> {
        let fitted = self.fitted()?;
        records.iter().map(|r| fitted.transform(r)).collect()
    }

    /// Declared column order.
    pub fn columns(&self) -> &[Column] {
        self.encoder.columns()
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.encoder.handle_unknown()
    }

    /// Total encoded width.
    pub fn n_features_out(&self) -> Result<usize> {
        Ok(self.fitted()?.n_features_out())
    }

    /// Vocabulary of `column`; `None` when unfitted or not declared.
    pub fn vocabulary(&self, column: Column) -> Option<&Vocabulary> {
        self.fitted.get()?.vocabulary(column)
    }
}
