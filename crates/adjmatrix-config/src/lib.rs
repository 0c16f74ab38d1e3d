//! Reduce policy configuration for adjacency-matrix aggregations.
//!
//! The config is plain data: parsing and validation live here, while the
//! core crate decides how each knob shapes key generation and reduction.

mod error;
mod types;

pub use error::{ConfigError, Result};
pub use types::{
    BucketOrder, Config, DEFAULT_MAX_BUCKETS, DEFAULT_MAX_FILTERS, DEFAULT_SEPARATOR, MatrixConfig,
};

use std::{fs, path::Path};

/// Read, parse, and validate one config file.
pub fn from_path(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;

    Ok(config)
}

/// Parse and validate config from an in-memory TOML document.
pub fn from_toml_str(raw: &str) -> Result<Config> {
    let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: "<inline>".into(),
        source,
    })?;
    validate(&config)?;

    Ok(config)
}

/// Validate cross-field constraints that serde defaults cannot express.
pub fn validate(config: &Config) -> Result<()> {
    config.matrix.validate()
}

///
/// TESTS
///
