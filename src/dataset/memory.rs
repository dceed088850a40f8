use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::{FareError, Result};
use crate::preprocessing::EncodedFeatureVector;
use std::ops::Range;

/// Encoded feature rows and their fare labels, held in memory.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    x: Vec<EncodedFeatureVector>,
    y: Vec<f64>,
    n_features: usize,
}

impl EncodedDataset {
    /// Builds a dataset from encoded rows and labels.
    ///
    /// # Errors
    /// - [`FareError::EmptyData`] when there are no rows.
    /// - [`FareError::FeatureMismatch`] when `x` and `y` differ in length or
    ///   the rows are ragged.
    pub fn new(x: Vec<EncodedFeatureVector>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(FareError::FeatureMismatch {
                expected_features: x.len(),
                got_features: y.len(),
            });
        }
        let n_features = match x.first() {
            Some(row) => row.len(),
            None => return Err(FareError::EmptyData("no training rows".to_string())),
        };
        if let Some(bad) = x.iter().find(|row| row.len() != n_features) {
            return Err(FareError::FeatureMismatch {
                expected_features: n_features,
                got_features: bad.len(),
            });
        }
        Ok(Self {
            x,
            y,
            n_features,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl Dataset for EncodedDataset {
    type Error = std::convert::Infallible;
    type Item = (EncodedFeatureVector, f64);

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> std::result::Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let data = batch_x
            .iter()
            .flat_map(|row| row.as_slice().iter())
            .copied()
            .collect();
        let x_tensor = Tensor2D::<B>::new(data, batch_x.len(), self.n_features);
        let y_tensor = Tensor1D::<B>::from_f64(batch_y.to_vec());

        Ok((x_tensor, y_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn rows(data: &[&[f32]]) -> Vec<EncodedFeatureVector> {
        data.iter().map(|r| EncodedFeatureVector::from(r.to_vec())).collect()
    }

    #[test]
    fn test_batches_cover_all_rows() {
        let ds = EncodedDataset::new(
            rows(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 0.0]]),
            vec![10.0, 20.0, 30.0],
        )
        .unwrap();
        let batches: Vec<_> = ds.batches::<CpuBackend>(2).map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].0.shape(), (2, 2));
        assert_eq!(batches[1].0.shape(), (1, 2));
        assert_eq!(batches[1].1.to_vec(), vec![30.0]);
    }

    #[test]
    fn test_empty_rejected() {
        let err = EncodedDataset::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, FareError::EmptyData(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = EncodedDataset::new(rows(&[&[1.0]]), vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FareError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = EncodedDataset::new(rows(&[&[1.0, 0.0], &[1.0]]), vec![1.0, 2.0]).unwrap_err();
        match err {
            FareError::FeatureMismatch {
                expected_features,
                got_features,
            } => {
                assert_eq!(expected_features, 2);
                assert_eq!(got_features, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
