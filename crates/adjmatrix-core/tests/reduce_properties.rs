use adjmatrix_core::{
    aggregation::SubAggregations,
    bucket::Bucket,
    error::AggregationError,
    key::FilterSet,
    matrix::{AdjacencyMatrix, Metadata},
    reduce::{ReduceContext, reduce},
};
use proptest::{prelude::*, sample::Index};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Hits
///
/// Summing nested aggregation; each leaf mirrors its bucket's doc count.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
struct Hits(u64);

impl SubAggregations for Hits {
    fn empty() -> Self {
        Self(0)
    }

    fn reduce(parts: Vec<Self>, _ctx: &mut ReduceContext) -> Result<Self, AggregationError> {
        Ok(Self(parts.into_iter().map(|hits| hits.0).sum()))
    }
}

///
/// Case
///
/// One generated run: a filter set and per-partition counts, where `None`
/// means the partition withheld a zero-count bucket.
///

#[derive(Clone, Debug)]
struct Case {
    filters: FilterSet,
    partitions: Vec<Vec<Option<u64>>>,
}

impl Case {
    fn matrices(&self) -> Vec<AdjacencyMatrix<Hits>> {
        let keys = self.filters.keys();

        self.partitions
            .iter()
            .map(|counts| {
                let buckets = keys
                    .iter()
                    .zip(counts)
                    .filter_map(|(key, count)| {
                        count.map(|count| Bucket::new(key.clone(), count, Hits(count)))
                    })
                    .collect();
                AdjacencyMatrix::new("matrix", buckets, None).expect("generated keys are unique")
            })
            .collect()
    }

    fn expected_totals(&self) -> BTreeMap<String, u64> {
        self.filters
            .keys()
            .into_iter()
            .enumerate()
            .map(|(index, key)| {
                let total = self
                    .partitions
                    .iter()
                    .map(|counts| counts[index].unwrap_or(0))
                    .sum();
                (key, total)
            })
            .collect()
    }

    /// One partition holding the whole dataset, every key reported.
    fn whole_dataset(&self) -> AdjacencyMatrix<Hits> {
        let buckets = self
            .expected_totals()
            .into_iter()
            .map(|(key, total)| Bucket::new(key, total, Hits(total)))
            .collect();

        AdjacencyMatrix::new("matrix", buckets, None).expect("unique keys")
    }

    fn final_ctx(&self) -> ReduceContext {
        ReduceContext::final_reduce().with_shape(self.filters.clone())
    }

    fn partial_ctx(&self) -> ReduceContext {
        ReduceContext::partial().with_shape(self.filters.clone())
    }
}

fn arb_case() -> impl Strategy<Value = Case> {
    prop::collection::btree_set("[a-z]{1,5}", 1..5)
        .prop_map(|names| FilterSet::new(names).expect("generated names are valid"))
        .prop_flat_map(|filters| {
            let key_count = filters.key_count();
            (
                Just(filters),
                prop::collection::vec(
                    prop::collection::vec(prop::option::weighted(0.7, 0u64..1_000), key_count),
                    1..6,
                ),
            )
        })
        .prop_map(|(filters, partitions)| Case {
            filters,
            partitions,
        })
}

fn counts_by_key(matrix: &AdjacencyMatrix<Hits>) -> BTreeMap<String, u64> {
    matrix
        .buckets()
        .iter()
        .map(|bucket| (bucket.key().to_string(), bucket.doc_count()))
        .collect()
}

fn nested_by_key(matrix: &AdjacencyMatrix<Hits>) -> BTreeMap<String, u64> {
    matrix
        .buckets()
        .iter()
        .map(|bucket| (bucket.key().to_string(), bucket.aggregations().0))
        .collect()
}

proptest! {
    #[test]
    fn merged_counts_equal_per_key_totals(case in arb_case()) {
        let merged = reduce(case.matrices(), &mut case.final_ctx()).expect("reduce");

        prop_assert_eq!(merged.len(), case.filters.key_count());
        prop_assert_eq!(counts_by_key(&merged), case.expected_totals());
        prop_assert_eq!(nested_by_key(&merged), case.expected_totals());
    }

    #[test]
    fn merge_is_order_independent(case in arb_case(), rotation in any::<Index>()) {
        let forward = reduce(case.matrices(), &mut case.final_ctx()).expect("reduce");

        let mut reversed_inputs = case.matrices();
        reversed_inputs.reverse();
        let reversed = reduce(reversed_inputs, &mut case.final_ctx()).expect("reduce");

        let mut rotated_inputs = case.matrices();
        let shift = rotation.index(rotated_inputs.len());
        rotated_inputs.rotate_left(shift);
        let rotated = reduce(rotated_inputs, &mut case.final_ctx()).expect("reduce");

        prop_assert_eq!(counts_by_key(&forward), counts_by_key(&reversed));
        prop_assert_eq!(counts_by_key(&forward), counts_by_key(&rotated));
        prop_assert_eq!(nested_by_key(&forward), nested_by_key(&rotated));
    }

    #[test]
    fn tree_reduce_matches_flat_reduce(case in arb_case(), split in any::<Index>()) {
        let flat = reduce(case.matrices(), &mut case.final_ctx()).expect("flat reduce");

        let mut left = case.matrices();
        let right = left.split_off(split.index(left.len() + 1).min(left.len()));

        let mut partials = Vec::new();
        for group in [left, right] {
            if !group.is_empty() {
                partials.push(reduce(group, &mut case.partial_ctx()).expect("partial reduce"));
            }
        }
        let tree = reduce(partials, &mut case.final_ctx()).expect("final reduce");

        prop_assert_eq!(counts_by_key(&tree), counts_by_key(&flat));
        prop_assert_eq!(nested_by_key(&tree), nested_by_key(&flat));
    }

    #[test]
    fn merge_matches_single_pass_over_all_documents(case in arb_case()) {
        let merged = reduce(case.matrices(), &mut case.final_ctx()).expect("reduce");
        let whole = reduce(vec![case.whole_dataset()], &mut case.final_ctx()).expect("reduce");

        prop_assert_eq!(counts_by_key(&merged), counts_by_key(&whole));
    }

    #[test]
    fn json_round_trip_is_lossless(
        case in arb_case(),
        metadata in prop::option::of(prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..4)),
    ) {
        let metadata: Option<Metadata> = metadata.map(|entries| {
            entries
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::from(value)))
                .collect()
        });
        let merged = reduce(case.matrices(), &mut case.final_ctx()).expect("reduce");
        let (name, buckets, _) = merged.into_parts();
        let matrix = AdjacencyMatrix::new(name, buckets, metadata).expect("unique keys");

        let text = serde_json::to_string(&matrix).expect("encode");
        let decoded: AdjacencyMatrix<Hits> = serde_json::from_str(&text).expect("decode");

        prop_assert_eq!(decoded, matrix);
    }
}

#[test]
fn disjoint_partitions_sum_rather_than_deduplicate() {
    let partition = || {
        AdjacencyMatrix::new("matrix", vec![Bucket::new("a", 3, Hits(3))], None)
            .expect("unique keys")
    };

    let merged = reduce(
        vec![partition(), partition()],
        &mut ReduceContext::final_reduce(),
    )
    .expect("reduce");

    assert_eq!(merged.doc_count("a"), 6);
    assert_eq!(merged.bucket("a").map(|b| b.aggregations().0), Some(6));
}
