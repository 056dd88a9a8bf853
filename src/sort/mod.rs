//! Comparison sort core.
//!
//! Two independent algorithms sort a borrowed sequence by a key produced by a
//! [`KeyExtractor`](crate::key::KeyExtractor):
//!
//! - [`merge`]: top-down merge sort. On equal keys the merge step emits the
//!   right-hand element first, so input order among ties is NOT preserved.
//! - [`quick`]: partitioning quick sort with a pluggable [`pivot`] strategy.
//!   With the default first-element pivot, input order among ties IS preserved.
//!
//! Both extract every key exactly once, never mutate the caller's sequence,
//! and either return a complete ordering or an error with no partial result.

pub mod merge;
pub mod pivot;
pub mod quick;

pub use merge::{merge_sort, MergeSorter};
pub use pivot::PivotStrategy;
pub use quick::{quick_sort, QuickSorter, TiePlacement};

use crate::key::KeyExtractor;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors raised while extracting or ordering sort keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Cannot extract sort key from field '{field}': expected a string, found {found}")]
    KeyExtraction { field: String, found: String },

    #[error("Cannot compare sort keys {left} and {right}")]
    KeyComparison { left: String, right: String },

    #[error("Partition depth {depth} exceeds limit of {limit}")]
    ResourceExhaustion { depth: usize, limit: usize },

    #[error("Sequence not sorted: record {index} sorts before its predecessor")]
    Unsorted { index: usize },
}

pub type Result<T> = std::result::Result<T, SortError>;

/// Sorting algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Merge,
    Quick,
}

impl Algorithm {
    /// Parse algorithm from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "merge" | "mergesort" | "merge-sort" => Some(Self::Merge),
            "quick" | "quicksort" | "quick-sort" => Some(Self::Quick),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Quick => "quick",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics from a single sort invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortStats {
    pub algorithm: Algorithm,
    pub records: usize,
    pub comparisons: usize,
    /// Deepest recursion (merge) or partition (quick) level reached.
    pub max_depth: usize,
}

impl fmt::Display for SortStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "algorithm={} records={} comparisons={} max_depth={}",
            self.algorithm, self.records, self.comparisons, self.max_depth
        )
    }
}

/// Key comparison with bookkeeping shared by both algorithms.
///
/// Keys are only required to be `PartialOrd`; a pair that has no ordering
/// (e.g. a NaN float) surfaces as [`SortError::KeyComparison`].
#[derive(Debug, Default)]
pub(crate) struct Comparator {
    comparisons: usize,
    max_depth: usize,
}

impl Comparator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn compare<K>(&mut self, a: &K, b: &K) -> Result<Ordering>
    where
        K: PartialOrd + fmt::Debug,
    {
        self.comparisons += 1;
        a.partial_cmp(b).ok_or_else(|| SortError::KeyComparison {
            left: format!("{:?}", a),
            right: format!("{:?}", b),
        })
    }

    /// `a < b`
    #[inline]
    pub(crate) fn less<K>(&mut self, a: &K, b: &K) -> Result<bool>
    where
        K: PartialOrd + fmt::Debug,
    {
        Ok(self.compare(a, b)? == Ordering::Less)
    }

    /// `a <= b`
    #[inline]
    pub(crate) fn less_eq<K>(&mut self, a: &K, b: &K) -> Result<bool>
    where
        K: PartialOrd + fmt::Debug,
    {
        Ok(self.compare(a, b)? != Ordering::Greater)
    }

    #[inline]
    pub(crate) fn observe_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    pub(crate) fn into_stats(self, algorithm: Algorithm, records: usize) -> SortStats {
        SortStats {
            algorithm,
            records,
            comparisons: self.comparisons,
            max_depth: self.max_depth,
        }
    }
}

/// Pair every item with its key, cloning items out of the borrowed input.
///
/// Extraction happens once per item, up front, so a malformed record fails
/// the sort before any ordering work is done.
pub(crate) fn decorate<T, E>(items: &[T], extractor: &E) -> Result<Vec<(E::Key, T)>>
where
    T: Clone,
    E: KeyExtractor<T>,
{
    items
        .iter()
        .map(|item| Ok((extractor.extract(item)?, item.clone())))
        .collect()
}
