//! ## Crate layout
//! - `config`: reduce policy parsing and validation.
//! - `core`: bucket keys, result values, reduce, and observability.
//! - `error`: the public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module carries the vocabulary collectors and coordinators
//! need; `merge` is the one-call entry point for config-driven reduces.

pub use adjmatrix_config as config;
pub use adjmatrix_core as core;

pub mod error;

pub use error::Error;

use crate::core::{
    aggregation::SubAggregations,
    key::FilterSet,
    matrix::AdjacencyMatrix,
    reduce::{ReduceContext, ReducePhase, reduce},
};
use adjmatrix_config::MatrixConfig;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::{
        Error,
        config::{BucketOrder, MatrixConfig},
        merge,
    };
}

/// Merge partition results under `config`, filling every key of the matrix
/// over `filters`.
///
/// The filter set is built with the configured separator and filter cap, so
/// every setting of `config` governs the reduce.
pub fn merge<A, I, S>(
    config: &MatrixConfig,
    filters: I,
    partitions: Vec<AdjacencyMatrix<A>>,
    phase: ReducePhase,
) -> Result<AdjacencyMatrix<A>, Error>
where
    A: SubAggregations,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    config.validate()?;
    let filters = FilterSet::from_config(filters, config)?;

    let mut ctx = ReduceContext::from_config(config, phase).with_shape(filters);

    Ok(reduce(partitions, &mut ctx)?)
}

///
/// TESTS
///
