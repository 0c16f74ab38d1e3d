//! Shared fixtures for unit tests.

use crate::{
    aggregation::{NoSubAggregations, SubAggregations},
    bucket::Bucket,
    error::AggregationError,
    matrix::AdjacencyMatrix,
    obs::{MetricsEvent, MetricsSink},
    reduce::ReduceContext,
    sampling::SamplingContext,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// Tally
///
/// Nested aggregation stand-in: a value sum plus the number of leaf
/// results folded into it, so tests can see what the reducer forwarded.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Tally {
    pub(crate) sum: u64,
    pub(crate) leaves: u64,
}

impl Tally {
    pub(crate) const fn leaf(sum: u64) -> Self {
        Self { sum, leaves: 1 }
    }
}

impl SubAggregations for Tally {
    fn empty() -> Self {
        Self::default()
    }

    fn reduce(parts: Vec<Self>, _ctx: &mut ReduceContext) -> Result<Self, AggregationError> {
        Ok(parts.into_iter().fold(Self::default(), |acc, part| Self {
            sum: acc.sum + part.sum,
            leaves: acc.leaves + part.leaves,
        }))
    }

    fn finalize_sampling(self, sampling: &SamplingContext) -> Self {
        Self {
            sum: sampling.scale_up(self.sum),
            leaves: self.leaves,
        }
    }
}

/// Build a partition result without nested aggregations.
pub(crate) fn counts(name: &str, buckets: &[(&str, u64)]) -> AdjacencyMatrix<NoSubAggregations> {
    AdjacencyMatrix::new(
        name,
        buckets
            .iter()
            .map(|(key, doc_count)| Bucket::new(*key, *doc_count, NoSubAggregations))
            .collect(),
        None,
    )
    .expect("fixture keys are unique")
}

/// Build a partition result whose nested tally mirrors each doc count.
pub(crate) fn tallies(name: &str, buckets: &[(&str, u64)]) -> AdjacencyMatrix<Tally> {
    AdjacencyMatrix::new(
        name,
        buckets
            .iter()
            .map(|(key, doc_count)| Bucket::new(*key, *doc_count, Tally::leaf(*doc_count)))
            .collect(),
        None,
    )
    .expect("fixture keys are unique")
}

/// Flatten a result into `(key, doc_count)` pairs in bucket order.
pub(crate) fn doc_counts<A>(matrix: &AdjacencyMatrix<A>) -> Vec<(String, u64)> {
    matrix
        .buckets()
        .iter()
        .map(|bucket| (bucket.key().to_string(), bucket.doc_count()))
        .collect()
}

///
/// CapturingSink
///
/// Metrics sink that keeps every event it receives, in order.
///

#[derive(Default)]
pub(crate) struct CapturingSink {
    events: RefCell<Vec<MetricsEvent>>,
}

impl CapturingSink {
    pub(crate) fn events(&self) -> Vec<MetricsEvent> {
        self.events.borrow().clone()
    }
}

impl MetricsSink for CapturingSink {
    fn record(&self, event: MetricsEvent) {
        self.events.borrow_mut().push(event);
    }
}
