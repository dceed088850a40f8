//! One-hot encoding for categorical record columns.

use crate::error::{FareError, Result};
use crate::preprocessing::assembler::{assemble, EncodedFeatureVector};
use crate::preprocessing::encoding::{HandleUnknown, Vocabulary};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::record::{Column, TravelRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unfitted one-hot encoder over a declared list of columns.
///
/// # Example
/// ```
/// use farecast::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
/// use farecast::record::{Column, TravelRecord};
///
/// let rec = |airline: &str| {
///     TravelRecord::from_fields(
///         ["18/12/2019", "ZQN", "10:20 AM", "WLG", "6:10 PM", "7h 50m", "(1 stop)", "", "", airline],
///         300.0,
///     )
/// };
/// let train = vec![rec("Jetstar"), rec("Air New Zealand"), rec("Jetstar")];
///
/// let fitted = OneHotEncoder::new(vec![Column::Airline]).fit(&train).unwrap();
/// assert_eq!(fitted.n_features_out(), 2);
/// assert_eq!(fitted.transform(&rec("Air New Zealand")).unwrap().as_slice(), &[0.0, 1.0]);
/// assert_eq!(fitted.transform(&rec("Qantas")).unwrap().as_slice(), &[0.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    columns: Vec<Column>,
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            handle_unknown: HandleUnknown::default(),
        }
    }

    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }
}

/// Rejects an empty column list or one naming a column twice.
pub(crate) fn validate_columns(columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        return Err(FareError::InvalidConfig(
            "at least one categorical column is required".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(columns.len());
    for c in columns {
        if !seen.insert(*c) {
            return Err(FareError::InvalidConfig(format!(
                "column {c} is declared more than once"
            )));
        }
    }
    Ok(())
}

/// Persisted state of a [`FittedOneHotEncoder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    pub columns: Vec<Column>,
    pub categories: Vec<Vec<String>>,
    pub handle_unknown: HandleUnknown,
}

/// Fitted one-hot encoder: one [`Vocabulary`] per declared column.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    columns: Vec<Column>,
    vocabularies: Vec<Vocabulary>,
    widths: Vec<usize>,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    pub fn vocabulary(&self, column: Column) -> Option<&Vocabulary> {
        self.slot(column).map(|i| &self.vocabularies[i])
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    fn slot(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Encodes one column of `record` into a block of its vocabulary's size.
    ///
    /// # Errors
    /// - [`FareError::InvalidConfig`] if `column` was not fitted.
    /// - [`FareError::UnknownCategory`] for an unseen value under
    ///   [`HandleUnknown::Error`].
    pub fn encode_column(&self, record: &TravelRecord, column: Column) -> Result<Vec<f32>> {
        let vocab = self.vocabulary(column).ok_or_else(|| {
            FareError::InvalidConfig(format!("column {column} is not part of this encoder"))
        })?;
        let value = record.value(column);
        let mut block = vec![0.0f32; vocab.len()];
        match vocab.index_of(value) {
            Some(idx) => block[idx] = 1.0,
            None if self.handle_unknown == HandleUnknown::Error => {
                return Err(FareError::UnknownCategory {
                    column: column.header_name().to_string(),
                    value: value.to_string(),
                });
            }
            None => {}
        }
        Ok(block)
    }

    /// Encodes all declared columns and concatenates the blocks.
    pub fn encode(&self, record: &TravelRecord) -> Result<EncodedFeatureVector> {
        let blocks = self
            .columns
            .iter()
            .map(|&c| self.encode_column(record, c))
            .collect::<Result<Vec<_>>>()?;
        assemble(blocks, &self.widths)
    }
}

impl Transformer for OneHotEncoder {
    type Input = TravelRecord;
    type Output = EncodedFeatureVector;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    /// # Errors
    /// - [`FareError::InvalidConfig`] for an empty or duplicated column list.
    /// - [`FareError::EmptyData`] when `data` is empty.
    fn fit(&self, data: &[TravelRecord]) -> Result<FittedOneHotEncoder> {
        validate_columns(&self.columns)?;
        if data.is_empty() {
            return Err(FareError::EmptyData(
                "cannot fit OneHotEncoder on an empty training set".to_string(),
            ));
        }

        let vocabularies: Vec<Vocabulary> = self
            .columns
            .iter()
            .map(|&c| Vocabulary::learn(data.iter().map(|r| r.value(c))))
            .collect();
        let widths = vocabularies.iter().map(Vocabulary::len).collect();

        Ok(FittedOneHotEncoder {
            columns: self.columns.clone(),
            vocabularies,
            widths,
            handle_unknown: self.handle_unknown,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = TravelRecord;
    type Output = EncodedFeatureVector;
    type Params = OneHotEncoderParams;

    fn transform(&self, item: &TravelRecord) -> Result<EncodedFeatureVector> {
        self.encode(item)
    }

    fn extract_params(&self) -> OneHotEncoderParams {
        OneHotEncoderParams {
            columns: self.columns.clone(),
            categories: self.vocabularies.iter().map(Vocabulary::to_vec).collect(),
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: OneHotEncoderParams) -> Result<Self> {
        validate_columns(&params.columns)?;
        if params.categories.len() != params.columns.len() {
            return Err(FareError::FeatureMismatch {
                expected_features: params.columns.len(),
                got_features: params.categories.len(),
            });
        }
        let vocabularies = params
            .categories
            .into_iter()
            .map(Vocabulary::from_values)
            .collect::<Result<Vec<_>>>()?;
        let widths = vocabularies.iter().map(Vocabulary::len).collect();

        Ok(FittedOneHotEncoder {
            columns: params.columns,
            vocabularies,
            widths,
            handle_unknown: params.handle_unknown,
        })
    }

    fn n_features_in(&self) -> usize {
        self.columns.len()
    }

    fn n_features_out(&self) -> usize {
        self.widths.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::SerializableParams;

    fn rec(from: &str, to: &str, airline: &str) -> TravelRecord {
        TravelRecord::from_fields(
            [
                "18/12/2019", from, "10:20 AM", to, "6:10 PM", "7h 50m", "(1 stop)", "", "",
                airline,
            ],
            250.0,
        )
    }

    fn training() -> Vec<TravelRecord> {
        vec![
            rec("ZQN", "WLG", "Air New Zealand"),
            rec("AKL", "WLG", "Jetstar"),
            rec("ZQN", "CHC", "Air New Zealand"),
        ]
    }

    fn default_encoder() -> OneHotEncoder {
        OneHotEncoder::new(Column::DEFAULT_ENCODED.to_vec())
    }

    #[test]
    fn test_fit_first_seen_vocabularies() {
        let fitted = default_encoder().fit(&training()).unwrap();
        let names = |c| fitted.vocabulary(c).unwrap().to_vec();
        assert_eq!(names(Column::DepartureAirport), vec!["ZQN", "AKL"]);
        assert_eq!(names(Column::ArrivalAirport), vec!["WLG", "CHC"]);
        assert_eq!(names(Column::Airline), vec!["Air New Zealand", "Jetstar"]);
        assert_eq!(fitted.n_features_in(), 3);
        assert_eq!(fitted.n_features_out(), 6);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = default_encoder().fit(&training()).unwrap();
        let b = default_encoder().fit(&training()).unwrap();
        assert_eq!(a.extract_params(), b.extract_params());
    }

    #[test]
    fn test_encode_blocks_in_declared_order() {
        let fitted = default_encoder().fit(&training()).unwrap();
        let x = fitted.encode(&rec("AKL", "CHC", "Air New Zealand")).unwrap();
        assert_eq!(x.as_slice(), &[0.0, 1.0, 0.0, 1.0, 1.0, 0.0]);

        let reordered = OneHotEncoder::new(vec![Column::Airline, Column::DepartureAirport])
            .fit(&training())
            .unwrap();
        let y = reordered.encode(&rec("AKL", "CHC", "Air New Zealand")).unwrap();
        assert_eq!(y.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_each_block_sums_to_one_for_training_rows() {
        let fitted = default_encoder().fit(&training()).unwrap();
        for r in training() {
            let x = fitted.encode(&r).unwrap();
            let mut offset = 0;
            for vocab in fitted.vocabularies() {
                let block = &x.as_slice()[offset..offset + vocab.len()];
                assert_eq!(block.iter().sum::<f32>(), 1.0);
                offset += vocab.len();
            }
        }
    }

    #[test]
    fn test_unknown_category_ignored_by_default() {
        let fitted = default_encoder().fit(&training()).unwrap();
        let x = fitted.encode(&rec("DUD", "WLG", "Jetstar")).unwrap();
        assert_eq!(x.as_slice(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_category_error_policy() {
        let fitted = default_encoder()
            .with_handle_unknown(HandleUnknown::Error)
            .fit(&training())
            .unwrap();
        match fitted.encode(&rec("DUD", "WLG", "Jetstar")) {
            Err(FareError::UnknownCategory { column, value }) => {
                assert_eq!(column, "DepartureAirport");
                assert_eq!(value, "DUD");
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_column_outside_encoder() {
        let fitted = default_encoder().fit(&training()).unwrap();
        let err = fitted
            .encode_column(&rec("ZQN", "WLG", "Jetstar"), Column::Baggage)
            .unwrap_err();
        assert!(matches!(err, FareError::InvalidConfig(_)));
    }

    #[test]
    fn test_fit_rejects_empty_inputs() {
        assert!(matches!(
            default_encoder().fit(&[]),
            Err(FareError::EmptyData(_))
        ));
        assert!(matches!(
            OneHotEncoder::new(vec![]).fit(&training()),
            Err(FareError::InvalidConfig(_))
        ));
        assert!(matches!(
            OneHotEncoder::new(vec![Column::Airline, Column::Airline]).fit(&training()),
            Err(FareError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_category_column() {
        let fitted = OneHotEncoder::new(vec![Column::Direct])
            .fit(&training())
            .unwrap();
        assert_eq!(fitted.n_features_out(), 1);
        assert_eq!(
            fitted.encode(&training()[0]).unwrap().as_slice(),
            &[1.0]
        );
    }

    #[test]
    fn test_fit_transform() {
        let out = default_encoder().fit_transform(&training()).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|x| x.len() == 6));
    }

    #[test]
    fn test_params_round_trip_through_bytes() {
        let fitted = default_encoder().fit(&training()).unwrap();
        let bytes = fitted.extract_params().to_bytes().unwrap();
        let restored =
            FittedOneHotEncoder::from_params(OneHotEncoderParams::from_bytes(&bytes).unwrap())
                .unwrap();
        let probe = rec("AKL", "CHC", "Jetstar");
        assert_eq!(fitted.encode(&probe).unwrap(), restored.encode(&probe).unwrap());
    }

    #[test]
    fn test_from_params_rejects_inconsistent_state() {
        let mut params = default_encoder().fit(&training()).unwrap().extract_params();
        params.categories.pop();
        assert!(matches!(
            FittedOneHotEncoder::from_params(params),
            Err(FareError::FeatureMismatch { .. })
        ));
    }
}
