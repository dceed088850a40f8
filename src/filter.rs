//! Fare outlier filtering.

use crate::error::{FareError, Result};
use crate::record::TravelRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Inclusive `[lower, upper]` range of fares kept for training and evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFareRange", into = "RawFareRange")]
pub struct FareRange {
    lower: f64,
    upper: f64,
}

#[derive(Serialize, Deserialize)]
struct RawFareRange {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawFareRange> for FareRange {
    type Error = FareError;

    fn try_from(raw: RawFareRange) -> Result<Self> {
        FareRange::new(raw.lower, raw.upper)
    }
}

impl From<FareRange> for RawFareRange {
    fn from(range: FareRange) -> Self {
        RawFareRange {
            lower: range.lower,
            upper: range.upper,
        }
    }
}

impl FareRange {
    pub const DEFAULT_LOWER: f64 = 30.0;
    pub const DEFAULT_UPPER: f64 = 1400.0;

    /// # Errors
    /// [`FareError::InvalidConfig`] unless both bounds are finite and
    /// `lower <= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(FareError::InvalidConfig(format!(
                "fare range bounds must be finite, got [{lower}, {upper}]"
            )));
        }
        if lower > upper {
            return Err(FareError::InvalidConfig(format!(
                "fare range lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn contains(&self, fare: f64) -> bool {
        self.lower <= fare && fare <= self.upper
    }

    /// Lazily drops records whose fare is outside the range.
    pub fn retain_iter<I>(self, records: I) -> impl Iterator<Item = TravelRecord>
    where
        I: IntoIterator<Item = TravelRecord>,
    {
        records.into_iter().filter(move |r| self.contains(r.fare))
    }
}

impl Default for FareRange {
    fn default() -> Self {
        Self {
            lower: Self::DEFAULT_LOWER,
            upper: Self::DEFAULT_UPPER,
        }
    }
}

/// Returns the records with `lower <= fare <= upper`, in input order.
pub fn filter_outliers(records: Vec<TravelRecord>, range: &FareRange) -> Vec<TravelRecord> {
    let total = records.len();
    let kept: Vec<_> = range.retain_iter(records).collect();
    info!(
        kept = kept.len(),
        dropped = total - kept.len(),
        lower = range.lower,
        upper = range.upper,
        "filtered fare outliers"
    );
    kept
}
