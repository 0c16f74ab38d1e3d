use serde::{Deserialize, Serialize};

///
/// Bucket
///
/// One matrix cell: a filter or filter-pair key, the number of documents
/// that matched it, and the nested aggregation results computed over them.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bucket<A> {
    key: String,
    doc_count: u64,
    aggregations: A,
}

impl<A> Bucket<A> {
    pub fn new(key: impl Into<String>, doc_count: u64, aggregations: A) -> Self {
        Self {
            key: key.into(),
            doc_count,
            aggregations,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn doc_count(&self) -> u64 {
        self.doc_count
    }

    #[must_use]
    pub const fn aggregations(&self) -> &A {
        &self.aggregations
    }

    /// Split this bucket into `(key, doc_count, aggregations)`.
    #[must_use]
    pub fn into_parts(self) -> (String, u64, A) {
        (self.key, self.doc_count, self.aggregations)
    }
}
