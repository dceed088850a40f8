//! Data sources for training and evaluation.
//!
//! Two layers live here:
//!
//! - [`csv`] turns delimited text into [`TravelRecord`](crate::record::TravelRecord)s,
//!   one row at a time.
//! - [`Dataset`] gives the trainer uniform mini-batch access to encoded
//!   `(X, y)` pairs, where `X` has shape `(n_samples, n_features)` and `y` has
//!   shape `(n_samples,)`. [`EncodedDataset`] is the in-memory implementation.
//!
//! # Example
//!
//! ```rust
//! use farecast::backend::CpuBackend;
//! use farecast::dataset::{Dataset, EncodedDataset};
//! use farecast::preprocessing::EncodedFeatureVector;
//!
//! let x = vec![
//!     EncodedFeatureVector::from(vec![1.0, 0.0]),
//!     EncodedFeatureVector::from(vec![0.0, 1.0]),
//! ];
//! let ds = EncodedDataset::new(x, vec![120.0, 340.0]).unwrap();
//!
//! for batch in ds.batches::<CpuBackend>(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.shape(), (1, 2));
//!     assert_eq!(y_batch.len(), 1);
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::{fmt::Debug, ops::Range};

pub mod csv;
pub mod memory;
pub use self::csv::{parse_line, read_all, RecordReader};
pub use self::memory::EncodedDataset;

/// Mini-batch access to `(X, y)` training data.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Type of a single dataset item.
    type Item: ?Sized;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Iterator over consecutive batches of `batch_size` samples; the last
    /// batch may be smaller.
    fn batches<'a, B: Backend>(&'a self, batch_size: usize) -> DatasetBatchIter<'a, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: std::marker::PhantomData,
        }
    }

    /// Loads the samples in `range` as tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;
}

/// Iterator returned by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
    _backend: std::marker::PhantomData<B>,
}

impl<'a, B: Backend, D: Dataset> Iterator for DatasetBatchIter<'a, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}
