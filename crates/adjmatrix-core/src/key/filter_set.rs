use crate::key::{DEFAULT_SEPARATOR, KeyError, KeyShape, pair_key, parse_key};
use adjmatrix_config::{DEFAULT_MAX_FILTERS, MatrixConfig};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

///
/// FilterSet
///
/// Ordered, validated filter names plus the separator used for pair keys.
/// A filter set fixes the full shape of one matrix: every singleton key and
/// every canonical pair key it can emit.
///

#[derive(Clone, Debug, Deref, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "FilterSetWire")]
pub struct FilterSet {
    #[deref]
    names: Vec<String>,
    separator: String,
}

impl FilterSet {
    /// Build a filter set with the default separator and filter cap.
    pub fn new<I, S>(names: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_limit(names, DEFAULT_SEPARATOR, DEFAULT_MAX_FILTERS)
    }

    /// Build a filter set with a custom separator and the default cap.
    pub fn with_separator<I, S>(names: I, separator: &str) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_limit(names, separator, DEFAULT_MAX_FILTERS)
    }

    /// Build a filter set using the separator and cap from `config`.
    pub fn from_config<I, S>(names: I, config: &MatrixConfig) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_limit(names, &config.separator, config.max_filters)
    }

    /// Build a filter set, rejecting any shape that could collide keys.
    pub fn with_limit<I, S>(
        names: I,
        separator: &str,
        max_filters: usize,
    ) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if separator.is_empty() {
            return Err(KeyError::EmptySeparator);
        }

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(KeyError::EmptyFilterSet);
        }
        if names.len() > max_filters {
            return Err(KeyError::TooManyFilters {
                count: names.len(),
                limit: max_filters,
            });
        }

        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(KeyError::EmptyFilterName { index });
            }
            if name.contains(separator) {
                return Err(KeyError::SeparatorInFilterName {
                    name: name.clone(),
                    separator: separator.to_string(),
                });
            }
            if names[..index].contains(name) {
                return Err(KeyError::DuplicateFilterName { name: name.clone() });
            }
        }

        Ok(Self {
            names,
            separator: separator.to_string(),
        })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Canonical pair key under this set's separator.
    #[must_use]
    pub fn pair_key(&self, a: &str, b: &str) -> String {
        pair_key(a, b, &self.separator)
    }

    /// Singleton keys in declared order.
    pub fn filter_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Pair keys in row-major declared order: `(0,1), (0,2), .., (1,2), ..`.
    pub fn pair_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.names.iter().enumerate().flat_map(move |(i, left)| {
            self.names[i + 1..]
                .iter()
                .map(move |right| self.pair_key(left, right))
        })
    }

    /// Every key of the matrix: singletons first, then pairs.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.key_count());
        keys.extend(self.filter_keys().map(str::to_string));
        keys.extend(self.pair_keys());

        keys
    }

    #[must_use]
    pub const fn key_count(&self) -> usize {
        super::expected_key_count(self.names.len())
    }

    /// Returns `true` if `key` is one of this matrix's keys.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        match parse_key(key, &self.separator) {
            Some(KeyShape::Filter(name)) => self.contains_name(name),
            Some(KeyShape::Pair { left, right }) => {
                left < right && self.contains_name(left) && self.contains_name(right)
            }
            None => false,
        }
    }

    fn contains_name(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }
}

///
/// FilterSetWire
///

#[derive(Deserialize)]
struct FilterSetWire {
    names: Vec<String>,
    #[serde(default = "default_separator")]
    separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl TryFrom<FilterSetWire> for FilterSet {
    type Error = KeyError;

    fn try_from(wire: FilterSetWire) -> Result<Self, Self::Error> {
        Self::with_separator(wire.names, &wire.separator)
    }
}
