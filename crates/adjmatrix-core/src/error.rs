use crate::{key::KeyError, serialize::SerializeError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Classified error surface shared by every adjacency-matrix component.
/// Component errors convert into this shape at API boundaries that need a
/// single error type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// AggregationError
///
/// Failures raised while constructing, reducing, or finalizing an
/// adjacency-matrix result.
///

#[derive(Debug, ThisError)]
pub enum AggregationError {
    #[error("duplicate bucket key in aggregation '{name}': {key}")]
    DuplicateKey { name: String, key: String },

    #[error("non-canonical bucket key in aggregation '{name}': {key}")]
    NonCanonicalKey { name: String, key: String },

    #[error("bucket key outside the filter set of aggregation '{name}': {key}")]
    KeyOutsideShape { name: String, key: String },

    #[error("reduce inputs disagree on aggregation name: expected '{expected}', found '{found}'")]
    NameMismatch { expected: String, found: String },

    #[error("reduce requires at least one partition result")]
    EmptyReduce,

    #[error("matrix bucket order requires a known filter set")]
    MissingShape,

    #[error("doc count overflow for bucket '{key}'")]
    DocCountOverflow { key: String },

    #[error("too many buckets: attempted={attempted}, limit={limit}")]
    BucketLimitExceeded { attempted: u64, limit: u64 },

    #[error("sampling probability must be in (0, 1]: {probability}")]
    InvalidSamplingProbability { probability: f64 },

    #[error("sub-aggregation reduce failed for bucket '{key}': {message}")]
    SubAggregation { key: String, message: String },

    #[error("{0}")]
    Key(#[from] KeyError),
}

impl AggregationError {
    /// Classify this failure for the shared error surface.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateKey { .. }
            | Self::NonCanonicalKey { .. }
            | Self::KeyOutsideShape { .. }
            | Self::NameMismatch { .. } => ErrorClass::InvariantViolation,
            Self::EmptyReduce | Self::MissingShape | Self::InvalidSamplingProbability { .. } => {
                ErrorClass::Unsupported
            }
            Self::DocCountOverflow { .. } | Self::BucketLimitExceeded { .. } => {
                ErrorClass::LimitExceeded
            }
            Self::SubAggregation { .. } => ErrorClass::Internal,
            Self::Key(err) => err.class(),
        }
    }

    /// Report which component raised this failure.
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::DuplicateKey { .. } | Self::InvalidSamplingProbability { .. } => {
                ErrorOrigin::Bucket
            }
            Self::Key(_) => ErrorOrigin::Key,
            _ => ErrorOrigin::Reduce,
        }
    }
}

impl From<AggregationError> for InternalError {
    fn from(err: AggregationError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

impl From<KeyError> for InternalError {
    fn from(err: KeyError) -> Self {
        Self::new(err.class(), ErrorOrigin::Key, err.to_string())
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::new(
            SerializeError::class(),
            ErrorOrigin::Serialize,
            err.to_string(),
        )
    }
}

impl From<adjmatrix_config::ConfigError> for InternalError {
    fn from(err: adjmatrix_config::ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    Unsupported,
    InvariantViolation,
    LimitExceeded,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
            Self::LimitExceeded => "limit_exceeded",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Component that raised an error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Key,
    Bucket,
    Reduce,
    Serialize,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Key => "key",
            Self::Bucket => "bucket",
            Self::Reduce => "reduce",
            Self::Serialize => "serialize",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
