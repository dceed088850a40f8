//! Categorical feature encoding.
//!
//! [`OneHotEncoder`] maps each declared string column to a block of binary
//! indicators, one per distinct value seen during fit. Values are kept as
//! strings end to end; there is no integer pre-mapping step.
//!
//! ```ignore
//! // Airline column with training values ["Air New Zealand", "Jetstar", "Air New Zealand"]
//! // vocabulary: ["Air New Zealand", "Jetstar"]
//! // "Jetstar"  -> [0, 1]
//! // "Qantas"   -> [0, 0]   (HandleUnknown::Ignore)
//! ```

mod one_hot;
mod vocabulary;

pub(crate) use one_hot::validate_columns;
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};
pub use vocabulary::Vocabulary;

/// Strategy for handling categories not seen during fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Raise [`FareError::UnknownCategory`](crate::error::FareError::UnknownCategory).
    Error,
    /// Encode the column as an all-zero block.
    #[default]
    Ignore,
}
