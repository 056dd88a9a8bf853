//! Top-down merge sort.
//!
//! Split at `floor(n/2)`, sort each half, merge. The merge takes from the left
//! half only when its front key is strictly less than the right front key, so
//! equal keys are emitted right-half first:
//!
//! ```text
//! [A{Rock}, B{Rock}]  ->  [B{Rock}, A{Rock}]
//! ```
//!
//! Output is ordered by key but input order among equal keys is not kept.

use super::{decorate, Algorithm, Comparator, Result, SortStats};
use crate::key::KeyExtractor;
use std::fmt;
use tracing::debug;

/// Merge sort over a borrowed sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSorter;

impl MergeSorter {
    pub fn new() -> Self {
        Self
    }

    /// Sort `items` by key, returning a new vector.
    pub fn sort<T, E>(&self, items: &[T], extractor: &E) -> Result<Vec<T>>
    where
        T: Clone,
        E: KeyExtractor<T>,
    {
        self.sort_with_stats(items, extractor)
            .map(|(sorted, _)| sorted)
    }

    /// Sort `items` by key and report comparison statistics.
    pub fn sort_with_stats<T, E>(&self, items: &[T], extractor: &E) -> Result<(Vec<T>, SortStats)>
    where
        T: Clone,
        E: KeyExtractor<T>,
    {
        let entries = decorate(items, extractor)?;
        let mut cmp = Comparator::new();
        let sorted = sort_entries(entries, &mut cmp, 0)?;

        let stats = cmp.into_stats(Algorithm::Merge, items.len());
        debug!(
            records = stats.records,
            comparisons = stats.comparisons,
            max_depth = stats.max_depth,
            "merge sort finished"
        );

        Ok((sorted.into_iter().map(|(_, item)| item).collect(), stats))
    }
}

/// Merge sort `items` by the key `extractor` produces.
pub fn merge_sort<T, E>(items: &[T], extractor: &E) -> Result<Vec<T>>
where
    T: Clone,
    E: KeyExtractor<T>,
{
    MergeSorter::new().sort(items, extractor)
}

fn sort_entries<K, T>(
    mut entries: Vec<(K, T)>,
    cmp: &mut Comparator,
    depth: usize,
) -> Result<Vec<(K, T)>>
where
    K: PartialOrd + fmt::Debug,
{
    cmp.observe_depth(depth);
    if entries.len() <= 1 {
        return Ok(entries);
    }

    let mid = entries.len() / 2;
    let right = entries.split_off(mid);
    let left = sort_entries(entries, cmp, depth + 1)?;
    let right = sort_entries(right, cmp, depth + 1)?;

    merge(left, right, cmp)
}

/// Merge two sorted runs. Ties go to `right`.
fn merge<K, T>(left: Vec<(K, T)>, right: Vec<(K, T)>, cmp: &mut Comparator) -> Result<Vec<(K, T)>>
where
    K: PartialOrd + fmt::Debug,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if cmp.less(&l.0, &r.0)? {
            left.next()
        } else {
            right.next()
        };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
