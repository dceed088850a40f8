//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: used during fitting; holds configuration and learns from data.
//! - [`FittedTransformer`]: after fitting; encodes new items and exposes its
//!   learned state as serializable parameters.

use crate::error::Result;
use crate::serialization::SerializableParams;

/// An unfitted transformer.
///
/// Fitting consumes a slice of training items and never mutates `self`, so
/// one configuration can be fitted on several training sets.
pub trait Transformer: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Learns the transformer state from `data`.
    fn fit(&self, data: &[Self::Input]) -> Result<Self::Fitted>;

    /// Fits on `data` and transforms every item of it.
    fn fit_transform(&self, data: &[Self::Input]) -> Result<Vec<Self::Output>> {
        let fitted = self.fit(data)?;
        data.iter().map(|item| fitted.transform(item)).collect()
    }
}

/// A fitted transformer ready for inference.
pub trait FittedTransformer: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;

    fn transform(&self, item: &Self::Input) -> Result<Self::Output>;

    /// Plain-data copy of the learned state.
    fn extract_params(&self) -> Self::Params;

    /// Rebuilds a fitted transformer from persisted parameters, validating
    /// their internal consistency.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Number of input columns consumed.
    fn n_features_in(&self) -> usize;

    /// Width of the produced feature vector.
    fn n_features_out(&self) -> usize;
}
