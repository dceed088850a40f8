//! Serialization of fitted parameters.
//!
//! Fitted models and encoders expose their state as plain data structs
//! (`Vec<f32>`, strings, scalars) that never hold backend tensors. Any such
//! struct deriving serde's traits is byte-serializable through
//! [`SerializableParams`], which is what the model archive writes.

use std::error::Error;

/// Parameter representations that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
