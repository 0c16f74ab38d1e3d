//! Core runtime for adjacency-matrix aggregations: bucket keys, result
//! values, the cross-partition reduce, and the observability hooks around it.
#![warn(unreachable_pub)]

pub mod aggregation;
pub mod bucket;
pub mod error;
pub mod key;
pub mod matrix;
pub mod obs;
pub mod reduce;
pub mod sampling;
pub mod serialize;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary only; errors and observability stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        aggregation::{NoSubAggregations, SubAggregations},
        bucket::Bucket,
        key::{FilterSet, pair_key},
        matrix::{AdjacencyMatrix, Metadata},
        reduce::{MatrixAccumulator, ReduceContext, ReducePhase, reduce},
        sampling::SamplingContext,
    };
}
