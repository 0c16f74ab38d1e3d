use crate::error::ErrorClass;
use thiserror::Error as ThisError;

///
/// KeyError
///
/// Filter-set shapes that would make two different buckets share a key.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("filter set must declare at least one filter")]
    EmptyFilterSet,

    #[error("pair-key separator must be non-empty")]
    EmptySeparator,

    #[error("filter name at index={index} is empty")]
    EmptyFilterName { index: usize },

    #[error("duplicate filter name: {name}")]
    DuplicateFilterName { name: String },

    #[error("filter name '{name}' contains the pair-key separator '{separator}'")]
    SeparatorInFilterName { name: String, separator: String },

    #[error("too many filters: count={count}, limit={limit}")]
    TooManyFilters { count: usize, limit: usize },
}

impl KeyError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::TooManyFilters { .. } => ErrorClass::LimitExceeded,
            _ => ErrorClass::InvariantViolation,
        }
    }
}
