//! Module: reduce
//! Responsibility: merging partition results into one adjacency matrix.
//! Does not own: nested aggregation semantics or key generation policy.
//! Boundary: the single entry point between partition collection and the final result.

mod accumulator;
mod context;


pub use accumulator::MatrixAccumulator;
pub use context::{ReduceContext, ReducePhase};

use crate::{
    aggregation::SubAggregations,
    error::AggregationError,
    matrix::AdjacencyMatrix,
    obs::sink::{MetricsEvent, ReduceSpan, record},
};
use tracing::{debug, warn};

/// Merge partition results into one result.
///
/// Partitions are folded in the order given. Doc counts are summed per key,
/// nested results for each key are forwarded to `SubAggregations::reduce`
/// in partition order, and zero-count buckets are kept. Name and metadata
/// come from the first partition; every partition must share that name.
pub fn reduce<A: SubAggregations>(
    partitions: Vec<AdjacencyMatrix<A>>,
    ctx: &mut ReduceContext,
) -> Result<AdjacencyMatrix<A>, AggregationError> {
    let mut span = ReduceSpan::new(ctx.phase(), partitions.len());

    let result = reduce_partitions(partitions, ctx, &mut span);
    match &result {
        Ok(merged) => {
            span.set_buckets_out(merged.len());
            debug!(
                phase = ?ctx.phase(),
                name = merged.name(),
                buckets = merged.len(),
                "Adjacency matrix reduce finished."
            );
        }
        Err(err) => {
            record(MetricsEvent::ReduceRejected { class: err.class() });
            warn!(
                phase = ?ctx.phase(),
                class = %err.class(),
                origin = %err.origin(),
                error = %err,
                "Adjacency matrix reduce rejected."
            );
        }
    }

    result
}

fn reduce_partitions<A: SubAggregations>(
    partitions: Vec<AdjacencyMatrix<A>>,
    ctx: &mut ReduceContext,
    span: &mut ReduceSpan,
) -> Result<AdjacencyMatrix<A>, AggregationError> {
    let mut accumulator = MatrixAccumulator::new();
    for partition in partitions {
        accumulator.push(partition, ctx)?;
    }
    span.set_buckets_in(accumulator.buckets_in());

    accumulator.finish(ctx)
}
