//! Module: key
//! Responsibility: bucket key generation and canonical pair ordering.
//! Does not own: bucket storage or reduce accumulation.
//! Boundary: every bucket key that enters a matrix is produced or checked here.

mod error;
mod filter_set;


pub use error::KeyError;
pub use filter_set::FilterSet;

pub use adjmatrix_config::DEFAULT_SEPARATOR;

///
/// KeyShape
///
/// Parsed view of one bucket key: a single filter or an intersection of two.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyShape<'a> {
    Filter(&'a str),
    Pair { left: &'a str, right: &'a str },
}

/// Build the canonical intersection key for two filter names.
///
/// The lexicographically smaller name always comes first, so both argument
/// orders produce byte-identical keys.
#[must_use]
pub fn pair_key(a: &str, b: &str, separator: &str) -> String {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };

    let mut key = String::with_capacity(left.len() + separator.len() + right.len());
    key.push_str(left);
    key.push_str(separator);
    key.push_str(right);

    key
}

/// Number of buckets in a full matrix over `filters` filters.
#[must_use]
pub const fn expected_key_count(filters: usize) -> usize {
    filters + filters * filters.saturating_sub(1) / 2
}

/// Classify one key under `separator`.
///
/// Returns `None` when the key cannot have come from a valid filter set:
/// an empty side or more than one separator.
#[must_use]
pub fn parse_key<'a>(key: &'a str, separator: &str) -> Option<KeyShape<'a>> {
    if separator.is_empty() {
        return (!key.is_empty()).then_some(KeyShape::Filter(key));
    }

    let mut parts = key.split(separator);
    let left = parts.next()?;
    let Some(right) = parts.next() else {
        return (!left.is_empty()).then_some(KeyShape::Filter(left));
    };
    if parts.next().is_some() || left.is_empty() || right.is_empty() {
        return None;
    }

    Some(KeyShape::Pair { left, right })
}

/// Returns `true` if `key` is a filter key or a pair key in `min<sep>max` form.
#[must_use]
pub fn is_canonical_key(key: &str, separator: &str) -> bool {
    match parse_key(key, separator) {
        Some(KeyShape::Filter(_)) => true,
        Some(KeyShape::Pair { left, right }) => left < right,
        None => false,
    }
}
