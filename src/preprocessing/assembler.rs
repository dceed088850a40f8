//! Concatenation of per-column one-hot blocks.

use crate::error::{FareError, Result};
use serde::{Deserialize, Serialize};

/// Flat numeric feature vector: one contiguous block per encoded column, in
/// the declared column order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector(Vec<f32>);

impl EncodedFeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for EncodedFeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl AsRef<[f32]> for EncodedFeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Concatenates `blocks` in order.
///
/// # Errors
/// [`FareError::FeatureMismatch`] if the number of blocks differs from the
/// number of widths, or a block's length differs from its declared width.
pub fn assemble(blocks: Vec<Vec<f32>>, widths: &[usize]) -> Result<EncodedFeatureVector> {
    if blocks.len() != widths.len() {
        return Err(FareError::FeatureMismatch {
            expected_features: widths.len(),
            got_features: blocks.len(),
        });
    }
    let mut out = Vec::with_capacity(widths.iter().sum());
    for (block, &width) in blocks.into_iter().zip(widths) {
        if block.len() != width {
            return Err(FareError::FeatureMismatch {
                expected_features: width,
                got_features: block.len(),
            });
        }
        out.extend(block);
    }
    Ok(EncodedFeatureVector(out))
}
