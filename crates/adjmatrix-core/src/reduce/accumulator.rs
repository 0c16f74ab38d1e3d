use crate::{
    aggregation::SubAggregations,
    bucket::Bucket,
    error::AggregationError,
    matrix::{AdjacencyMatrix, Metadata},
    obs::sink::{MetricsEvent, record},
    reduce::ReduceContext,
};
use adjmatrix_config::BucketOrder;
use std::collections::HashMap;

///
/// BucketSlot
///
/// Running state for one key: the summed count and every nested result
/// reported for it, in partition order.
///

struct BucketSlot<A> {
    key: String,
    doc_count: u64,
    parts: Vec<A>,
}

///
/// MatrixAccumulator
///
/// Incremental fold over partition results. Partitions can be pushed as
/// they arrive; `finish` produces the merged result. Keys keep the order
/// they were first seen in. A partition that fails to push leaves no
/// trace in the running state.
///

pub struct MatrixAccumulator<A> {
    name: Option<String>,
    metadata: Option<Metadata>,
    partitions: u64,
    buckets_in: u64,
    slots: Vec<BucketSlot<A>>,
    slot_by_key: HashMap<String, usize>,
}

impl<A: SubAggregations> MatrixAccumulator<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            metadata: None,
            partitions: 0,
            buckets_in: 0,
            slots: Vec::new(),
            slot_by_key: HashMap::new(),
        }
    }

    /// Number of partitions folded so far.
    #[must_use]
    pub const fn partitions(&self) -> u64 {
        self.partitions
    }

    /// Number of buckets read across all folded partitions.
    #[must_use]
    pub const fn buckets_in(&self) -> u64 {
        self.buckets_in
    }

    /// Number of distinct keys seen so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fold one partition result into the running state.
    ///
    /// Every check runs before any state changes, so a rejected partition
    /// leaves the accumulator exactly as it was.
    pub fn push(
        &mut self,
        partition: AdjacencyMatrix<A>,
        ctx: &ReduceContext,
    ) -> Result<(), AggregationError> {
        if ctx.strict() {
            partition.validate_keys(ctx.separator(), ctx.shape())?;
        }
        if let Some(expected) = &self.name
            && expected != partition.name()
        {
            return Err(AggregationError::NameMismatch {
                expected: expected.clone(),
                found: partition.name().to_string(),
            });
        }

        // keys are unique within one partition, so each slot is summed once
        let mut sums = Vec::with_capacity(partition.len());
        for bucket in partition.buckets() {
            let current = self
                .slot_by_key
                .get(bucket.key())
                .map_or(0, |index| self.slots[*index].doc_count);
            let sum = current.checked_add(bucket.doc_count()).ok_or_else(|| {
                AggregationError::DocCountOverflow {
                    key: bucket.key().to_string(),
                }
            })?;
            sums.push(sum);
        }

        let (name, buckets, metadata) = partition.into_parts();
        if self.name.is_none() {
            self.name = Some(name);
            self.metadata = metadata;
        }

        for (bucket, sum) in buckets.into_iter().zip(sums) {
            let (key, _, aggregations) = bucket.into_parts();
            let slot = self.slot_mut(key);
            slot.doc_count = sum;
            slot.parts.push(aggregations);
            self.buckets_in = self.buckets_in.saturating_add(1);
        }
        self.partitions = self.partitions.saturating_add(1);

        Ok(())
    }

    /// Produce the merged result.
    ///
    /// Keys of the context's filter set that no partition reported are
    /// added with a zero count, then buckets are ordered by the context's
    /// bucket order and charged against its bucket budget.
    pub fn finish(
        mut self,
        ctx: &mut ReduceContext,
    ) -> Result<AdjacencyMatrix<A>, AggregationError> {
        let Some(name) = self.name.take() else {
            return Err(AggregationError::EmptyReduce);
        };

        self.fill_missing_shape_keys(ctx);
        self.order_slots(ctx)?;
        ctx.consume_buckets(self.slots.len() as u64)?;

        let mut buckets = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            let aggregations = if slot.parts.is_empty() {
                A::empty()
            } else {
                A::reduce(slot.parts, ctx)?
            };
            buckets.push(Bucket::new(slot.key, slot.doc_count, aggregations));
        }

        Ok(AdjacencyMatrix::from_unique_buckets(
            name,
            buckets,
            self.metadata,
        ))
    }

    fn slot_mut(&mut self, key: String) -> &mut BucketSlot<A> {
        let index = match self.slot_by_key.get(&key) {
            Some(index) => *index,
            None => {
                let index = self.slots.len();
                self.slot_by_key.insert(key.clone(), index);
                self.slots.push(BucketSlot {
                    key,
                    doc_count: 0,
                    parts: Vec::new(),
                });
                index
            }
        };

        &mut self.slots[index]
    }

    fn fill_missing_shape_keys(&mut self, ctx: &ReduceContext) {
        let Some(shape) = ctx.shape() else {
            return;
        };

        let mut filled = 0u64;
        for key in shape.keys() {
            if !self.slot_by_key.contains_key(&key) {
                self.slot_mut(key);
                filled += 1;
            }
        }
        if filled > 0 {
            record(MetricsEvent::ZeroFilled { buckets: filled });
        }
    }

    fn order_slots(&mut self, ctx: &ReduceContext) -> Result<(), AggregationError> {
        match ctx.bucket_order() {
            BucketOrder::FirstSeen => {}
            BucketOrder::Key => self.slots.sort_by(|a, b| a.key.cmp(&b.key)),
            BucketOrder::Matrix => {
                let shape = ctx.shape().ok_or(AggregationError::MissingShape)?;
                let position: HashMap<String, usize> = shape
                    .keys()
                    .into_iter()
                    .enumerate()
                    .map(|(index, key)| (key, index))
                    .collect();

                // stable sort keeps first-seen order for keys outside the shape
                self.slots
                    .sort_by_key(|slot| position.get(&slot.key).copied().unwrap_or(usize::MAX));
            }
        }

        Ok(())
    }
}

impl<A: SubAggregations> Default for MatrixAccumulator<A> {
    fn default() -> Self {
        Self::new()
    }
}
