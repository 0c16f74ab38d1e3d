//! Module: aggregation
//! Responsibility: the nested sub-aggregation capability buckets depend on.
//! Does not own: the semantics of any concrete nested aggregation.
//! Boundary: the reducer forwards ordered per-key lists here and stores the result.

use crate::{error::AggregationError, reduce::ReduceContext, sampling::SamplingContext};
use serde::{Deserialize, Serialize};

///
/// SubAggregations
///
/// Nested aggregation results carried by one bucket.
/// `reduce` receives the values reported for one key, in partition order,
/// and must be associative so partial reduces compose.
///

pub trait SubAggregations: Sized {
    /// Value for a bucket that carries no nested results.
    fn empty() -> Self;

    /// Merge the values reported for one bucket key.
    fn reduce(parts: Vec<Self>, ctx: &mut ReduceContext) -> Result<Self, AggregationError>;

    /// Scale sampled values up after the final reduce.
    #[must_use]
    fn finalize_sampling(self, _sampling: &SamplingContext) -> Self {
        self
    }
}

///
/// NoSubAggregations
///
/// Marker for matrices whose buckets carry no nested aggregations.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NoSubAggregations;

impl SubAggregations for NoSubAggregations {
    fn empty() -> Self {
        Self
    }

    fn reduce(_parts: Vec<Self>, _ctx: &mut ReduceContext) -> Result<Self, AggregationError> {
        Ok(Self)
    }
}
