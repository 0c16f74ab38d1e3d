use adjmatrix_config::ConfigError;
use adjmatrix_core::{
    error::{AggregationError, ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    key::KeyError,
    serialize::SerializeError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<AggregationError> for Error {
    fn from(err: AggregationError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Inputs broke a matrix invariant (duplicate or non-canonical keys,
    /// mismatched names).
    InvalidInput,

    /// The request asks for something this aggregation does not do.
    Unsupported,

    /// A filter, bucket, or doc-count limit was exceeded.
    LimitExceeded,

    /// Configuration could not be read or failed validation.
    Config,

    /// The caller cannot remediate this.
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::InvariantViolation => Self::InvalidInput,
            ErrorClass::Unsupported => Self::Unsupported,
            ErrorClass::LimitExceeded => Self::LimitExceeded,
            ErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Key,
    Bucket,
    Reduce,
    Serialize,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Key => Self::Key,
            CoreErrorOrigin::Bucket => Self::Bucket,
            CoreErrorOrigin::Reduce => Self::Reduce,
            CoreErrorOrigin::Serialize => Self::Serialize,
            CoreErrorOrigin::Config => Self::Config,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_errors_map_to_key_origin() {
        let err = Error::from(KeyError::DuplicateFilterName {
            name: "a".to_string(),
        });

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(err.origin, ErrorOrigin::Key);
        assert_eq!(err.to_string(), "duplicate filter name: a");
    }

    #[test]
    fn public_error_round_trips_through_json() {
        let err = Error::new(ErrorKind::LimitExceeded, ErrorOrigin::Reduce, "too many");

        let decoded: Error =
            serde_json::from_str(&serde_json::to_string(&err).expect("encode")).expect("decode");

        assert_eq!(decoded.kind, err.kind);
        assert_eq!(decoded.origin, err.origin);
        assert_eq!(decoded.message, err.message);
    }
}
