//! Sort orderings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::object::KeyValueCoding;
use crate::value::Value;

/// Direction and case handling of a sort ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortSelector {
    #[default]
    CompareAscending,
    CompareDescending,
    CompareCaseInsensitiveAscending,
    CompareCaseInsensitiveDescending,
}

/// Orders objects by the value of one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrdering {
    pub key: String,
    #[serde(default)]
    pub selector: SortSelector,
}

impl SortOrdering {
    pub fn new(key: impl Into<String>, selector: SortSelector) -> Self {
        Self {
            key: key.into(),
            selector,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortSelector::CompareAscending)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortSelector::CompareDescending)
    }

    pub fn asc_insensitive(key: impl Into<String>) -> Self {
        Self::new(key, SortSelector::CompareCaseInsensitiveAscending)
    }

    pub fn desc_insensitive(key: impl Into<String>) -> Self {
        Self::new(key, SortSelector::CompareCaseInsensitiveDescending)
    }

    /// Compares two objects by this ordering's key.
    pub fn compare<T: KeyValueCoding + ?Sized>(&self, left: &T, right: &T) -> Ordering {
        let left = left.value_for_key(&self.key);
        let right = right.value_for_key(&self.key);

        match self.selector {
            SortSelector::CompareAscending => left.sort_cmp(&right),
            SortSelector::CompareDescending => right.sort_cmp(&left),
            SortSelector::CompareCaseInsensitiveAscending => lowercase(left).sort_cmp(&lowercase(right)),
            SortSelector::CompareCaseInsensitiveDescending => lowercase(right).sort_cmp(&lowercase(left)),
        }
    }
}

fn lowercase(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.to_lowercase()),
        other => other,
    }
}

/// Stable sort by a list of orderings; the first ordering is the primary key
/// and later ones break ties in sequence.
pub fn sort_by_orderings<T, F, K>(items: &mut [T], orderings: &[SortOrdering], resolve: F)
where
    F: Fn(&T) -> &K,
    K: KeyValueCoding + ?Sized,
{
    if orderings.is_empty() {
        return;
    }

    items.sort_by(|a, b| {
        let (a, b) = (resolve(a), resolve(b));
        orderings
            .iter()
            .map(|ordering| ordering.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}
