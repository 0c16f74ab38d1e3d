//! Module: matrix
//! Responsibility: the adjacency-matrix result value and its invariants.
//! Does not own: key generation policy or cross-partition accumulation.
//! Boundary: collectors construct these per partition; the reducer consumes them.


use crate::{
    aggregation::SubAggregations,
    bucket::Bucket,
    error::AggregationError,
    key::{FilterSet, is_canonical_key},
    sampling::SamplingContext,
};
use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

///
/// Metadata
///
/// Requester-attached metadata. Carried through reduces untouched.
///

pub type Metadata = BTreeMap<String, serde_json::Value>;

///
/// AdjacencyMatrix
///
/// Result of one adjacency-matrix aggregation, either for a single
/// partition or merged across partitions. Bucket keys are unique and the
/// bucket list keeps the order it was built in.
///

#[derive(Clone, Debug, Deserialize, Eq, IntoIterator, PartialEq, Serialize)]
#[serde(
    try_from = "MatrixWire<A>",
    bound(deserialize = "A: Deserialize<'de>")
)]
pub struct AdjacencyMatrix<A> {
    name: String,

    #[into_iterator(owned, ref)]
    buckets: Vec<Bucket<A>>,

    #[serde(rename = "meta", skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl<A> AdjacencyMatrix<A> {
    /// Build a result, rejecting duplicate bucket keys.
    pub fn new(
        name: impl Into<String>,
        buckets: Vec<Bucket<A>>,
        metadata: Option<Metadata>,
    ) -> Result<Self, AggregationError> {
        let name = name.into();

        let mut seen = HashSet::with_capacity(buckets.len());
        for bucket in &buckets {
            if !seen.insert(bucket.key()) {
                return Err(AggregationError::DuplicateKey {
                    name,
                    key: bucket.key().to_string(),
                });
            }
        }

        Ok(Self {
            name,
            buckets,
            metadata,
        })
    }

    /// Build a result whose keys are unique by construction.
    pub(crate) const fn from_unique_buckets(
        name: String,
        buckets: Vec<Bucket<A>>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            name,
            buckets,
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn buckets(&self) -> &[Bucket<A>] {
        &self.buckets
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Look up one bucket by key.
    #[must_use]
    pub fn bucket(&self, key: &str) -> Option<&Bucket<A>> {
        self.buckets.iter().find(|bucket| bucket.key() == key)
    }

    /// Doc count for `key`; a key this result does not carry counts as zero.
    #[must_use]
    pub fn doc_count(&self, key: &str) -> u64 {
        self.bucket(key).map_or(0, Bucket::doc_count)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().map(Bucket::key)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of every bucket's doc count. Pair buckets overlap their filter
    /// buckets, so this is not a document count.
    #[must_use]
    pub fn total_doc_count(&self) -> u64 {
        self.buckets
            .iter()
            .fold(0u64, |total, bucket| total.saturating_add(bucket.doc_count()))
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Bucket<A>>, Option<Metadata>) {
        (self.name, self.buckets, self.metadata)
    }

    /// Check every key is canonical under `separator` and, when a filter
    /// set is given, that it belongs to that set.
    pub fn validate_keys(
        &self,
        separator: &str,
        shape: Option<&FilterSet>,
    ) -> Result<(), AggregationError> {
        for key in self.keys() {
            if !is_canonical_key(key, separator) {
                return Err(AggregationError::NonCanonicalKey {
                    name: self.name.clone(),
                    key: key.to_string(),
                });
            }
            if let Some(shape) = shape
                && !shape.contains_key(key)
            {
                return Err(AggregationError::KeyOutsideShape {
                    name: self.name.clone(),
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl<A: SubAggregations> AdjacencyMatrix<A> {
    /// Build an all-zero result carrying every key of `filters`.
    #[must_use]
    pub fn empty_for(
        name: impl Into<String>,
        filters: &FilterSet,
        metadata: Option<Metadata>,
    ) -> Self {
        let buckets = filters
            .keys()
            .into_iter()
            .map(|key| Bucket::new(key, 0, A::empty()))
            .collect();

        Self::from_unique_buckets(name.into(), buckets, metadata)
    }

    /// Scale every doc count and nested result up by the sampling inverse.
    #[must_use]
    pub fn finalize_sampling(self, sampling: &SamplingContext) -> Self {
        let buckets = self
            .buckets
            .into_iter()
            .map(|bucket| {
                let (key, doc_count, aggregations) = bucket.into_parts();
                Bucket::new(
                    key,
                    sampling.scale_up(doc_count),
                    aggregations.finalize_sampling(sampling),
                )
            })
            .collect();

        Self::from_unique_buckets(self.name, buckets, self.metadata)
    }
}

///
/// MatrixWire
///
/// Decoded form that must pass construction checks before it becomes a
/// result.
///

#[derive(Deserialize)]
struct MatrixWire<A> {
    name: String,
    buckets: Vec<Bucket<A>>,
    #[serde(default, rename = "meta")]
    metadata: Option<Metadata>,
}

impl<A> TryFrom<MatrixWire<A>> for AdjacencyMatrix<A> {
    type Error = AggregationError;

    fn try_from(wire: MatrixWire<A>) -> Result<Self, Self::Error> {
        Self::new(wire.name, wire.buckets, wire.metadata)
    }
}
