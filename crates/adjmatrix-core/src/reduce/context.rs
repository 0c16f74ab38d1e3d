use crate::{error::AggregationError, key::FilterSet};
use adjmatrix_config::{BucketOrder, MatrixConfig};

///
/// ReducePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReducePhase {
    /// Intermediate merge of a subset of partitions; more reduces follow.
    Partial,
    /// Last merge before the result leaves the coordinator.
    Final,
}

///
/// ReduceContext
///
/// Policy and bucket budget for one reduce. The budget is only charged on
/// the final phase, so partial reduces can run over any subset of
/// partitions without tripping it.
///

#[derive(Clone, Debug)]
pub struct ReduceContext {
    phase: ReducePhase,
    shape: Option<FilterSet>,
    separator: String,
    strict: bool,
    bucket_order: BucketOrder,
    max_buckets: u64,
    consumed_buckets: u64,
}

impl ReduceContext {
    /// Build a context for `phase` from one matrix config.
    #[must_use]
    pub fn from_config(config: &MatrixConfig, phase: ReducePhase) -> Self {
        Self {
            phase,
            shape: None,
            separator: config.separator.clone(),
            strict: config.strict,
            bucket_order: config.bucket_order,
            max_buckets: config.max_buckets,
            consumed_buckets: 0,
        }
    }

    /// Final-phase context with default policy.
    #[must_use]
    pub fn final_reduce() -> Self {
        Self::from_config(&MatrixConfig::default(), ReducePhase::Final)
    }

    /// Partial-phase context with default policy.
    #[must_use]
    pub fn partial() -> Self {
        Self::from_config(&MatrixConfig::default(), ReducePhase::Partial)
    }

    /// Attach the filter set the partitions were collected with.
    /// The set's separator replaces the configured one.
    #[must_use]
    pub fn with_shape(mut self, shape: FilterSet) -> Self {
        self.separator = shape.separator().to_string();
        self.shape = Some(shape);
        self
    }

    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub const fn with_bucket_order(mut self, bucket_order: BucketOrder) -> Self {
        self.bucket_order = bucket_order;
        self
    }

    #[must_use]
    pub const fn with_max_buckets(mut self, max_buckets: u64) -> Self {
        self.max_buckets = max_buckets;
        self
    }

    #[must_use]
    pub const fn phase(&self) -> ReducePhase {
        self.phase
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.phase == ReducePhase::Final
    }

    #[must_use]
    pub const fn shape(&self) -> Option<&FilterSet> {
        self.shape.as_ref()
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    #[must_use]
    pub const fn bucket_order(&self) -> BucketOrder {
        self.bucket_order
    }

    #[must_use]
    pub const fn max_buckets(&self) -> u64 {
        self.max_buckets
    }

    #[must_use]
    pub const fn consumed_buckets(&self) -> u64 {
        self.consumed_buckets
    }

    /// Charge `count` buckets against the budget on the final phase.
    /// Nested aggregations that emit buckets charge the same budget.
    pub fn consume_buckets(&mut self, count: u64) -> Result<(), AggregationError> {
        if !self.is_final() {
            return Ok(());
        }

        let attempted = self.consumed_buckets.saturating_add(count);
        if attempted > self.max_buckets {
            return Err(AggregationError::BucketLimitExceeded {
                attempted,
                limit: self.max_buckets,
            });
        }
        self.consumed_buckets = attempted;

        Ok(())
    }
}
