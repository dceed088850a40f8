//! Turning travel records into numeric feature vectors.
//!
//! Transformers follow the same type-state pattern as models: an unfitted
//! transformer holds configuration, `fit` learns from training records and
//! returns a fitted transformer that can encode new records and be persisted.
//!
//! # Components
//!
//! - [`OneHotEncoder`] / [`FittedOneHotEncoder`]: one vocabulary per
//!   categorical column, learned in first-seen order.
//! - [`assemble`]: concatenates per-column blocks into one
//!   [`EncodedFeatureVector`].
//! - [`FeaturePipeline`]: encoder and assembler as a single write-once object.
//!
//! # Example
//!
//! ```
//! use farecast::preprocessing::{FeaturePipeline, HandleUnknown};
//! use farecast::record::{Column, TravelRecord};
//!
//! let fields = |from: &'static str, airline: &'static str| {
//!     [
//!         "18/12/2019", from, "10:20 AM", "WLG", "6:10 PM", "7h 50m",
//!         "(1 stop)", "", "", airline,
//!     ]
//! };
//! let train = vec![
//!     TravelRecord::from_fields(fields("ZQN", "Air New Zealand"), 422.0),
//!     TravelRecord::from_fields(fields("AKL", "Jetstar"), 150.0),
//! ];
//!
//! let pipeline = FeaturePipeline::new(
//!     vec![Column::DepartureAirport, Column::Airline],
//!     HandleUnknown::Ignore,
//! )
//! .unwrap();
//! pipeline.fit(&train).unwrap();
//!
//! let x = pipeline.encode(&train[1]).unwrap();
//! assert_eq!(x.as_slice(), &[0.0, 1.0, 0.0, 1.0]);
//! ```

pub mod assembler;
pub mod encoding;
pub mod pipeline;
pub mod traits;

pub use assembler::{assemble, EncodedFeatureVector};
pub use encoding::{
    FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams, Vocabulary,
};
pub use pipeline::FeaturePipeline;
pub use traits::{FittedTransformer, Transformer};
