use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Default pair-key separator.
pub const DEFAULT_SEPARATOR: &str = "&";

/// Default cap on the number of filters in one matrix.
pub const DEFAULT_MAX_FILTERS: usize = 100;

/// Default bucket budget for one final reduce.
pub const DEFAULT_MAX_BUCKETS: u64 = 65_536;

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub matrix: MatrixConfig,
}

///
/// MatrixConfig
///
/// Key-generation and reduce policy for one adjacency-matrix aggregation.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatrixConfig {
    /// Text placed between two filter names in a pair key.
    pub separator: String,

    /// Maximum number of filters one matrix may declare.
    pub max_filters: usize,

    /// Maximum number of buckets a final reduce may emit.
    pub max_buckets: u64,

    /// Reject non-canonical or out-of-shape keys during reduce.
    pub strict: bool,

    pub bucket_order: BucketOrder,
}

impl MatrixConfig {
    /// Check the constraints a deserialized config must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(ConfigError::validation("matrix.separator must be non-empty"));
        }
        if self.separator.chars().any(char::is_whitespace) {
            return Err(ConfigError::validation(
                "matrix.separator must not contain whitespace",
            ));
        }
        if self.max_filters == 0 {
            return Err(ConfigError::validation(
                "matrix.max_filters must be greater than zero",
            ));
        }
        if self.max_buckets == 0 {
            return Err(ConfigError::validation(
                "matrix.max_buckets must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            max_filters: DEFAULT_MAX_FILTERS,
            max_buckets: DEFAULT_MAX_BUCKETS,
            strict: true,
            bucket_order: BucketOrder::default(),
        }
    }
}

///
/// BucketOrder
///
/// Output order of merged buckets.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Keys in the order they were first seen while scanning partitions.
    #[default]
    FirstSeen,

    /// Keys sorted by code-point order.
    Key,

    /// Keys in filter-set enumeration order (singletons, then pairs).
    Matrix,
}
