//! Binary wire helpers for partition and merged results.
//!
//! Results travel between partitions and the coordinator as CBOR; every
//! decode runs the same construction checks as `AdjacencyMatrix::new`.

mod cbor;

use crate::error::ErrorClass;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

pub use cbor::MAX_PAYLOAD_BYTES;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),
}

impl SerializeError {
    pub(crate) const fn class() -> ErrorClass {
        ErrorClass::Internal
    }
}

/// Encode a value as CBOR.
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::serialize(value)
}

/// Decode a value produced by [`serialize`].
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize(bytes)
}

///
/// TESTS
///
