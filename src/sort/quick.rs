//! Partitioning quick sort.
//!
//! `sort(xs) = sort(left) ++ [pivot] ++ sort(right)`. Both partitions are
//! order-preserving filters over the non-pivot elements. Where keys equal to
//! the pivot land is set by [`TiePlacement`]:
//!
//! - `BeforePivot` (default): `left` holds keys `<=` pivot. Equal keys that
//!   follow the pivot in the input overtake it:
//!   `[A{Pop}, B{Jazz}, C{Pop}]  ->  [B, C, A]`
//! - `AfterPivot`: `left` holds keys `<` pivot. Every equal key follows the
//!   first-element pivot in the input, so the sort is stable:
//!   `[A{Pop}, B{Jazz}, C{Pop}]  ->  [B, A, C]`
//!
//! Partitions are processed from an explicit work stack rather than the call
//! stack. Sorted or reversed input drives the partition depth to `n - 2`; past
//! the configured limit the sort fails with [`SortError::ResourceExhaustion`].

use super::pivot::{PivotSelector, PivotStrategy};
use super::{decorate, Algorithm, Comparator, Result, SortError, SortStats};
use crate::config;
use crate::key::KeyExtractor;
use std::fmt;
use tracing::{debug, warn};

/// Pending work on the partition stack.
enum Task<K, T> {
    Partition { entries: Vec<(K, T)>, depth: usize },
    Emit(T),
}

/// Partition receiving keys equal to the pivot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePlacement {
    /// Equal keys sort before the pivot (`left` = keys `<=` pivot).
    #[default]
    BeforePivot,
    /// Equal keys sort after the pivot (`left` = keys `<` pivot). Stable
    /// with [`PivotStrategy::First`].
    AfterPivot,
}

impl TiePlacement {
    /// Parse placement from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "after" | "after-pivot" => Some(Self::AfterPivot),
            "before" | "before-pivot" => Some(Self::BeforePivot),
            _ => None,
        }
    }
}

/// Quick sort configuration.
#[derive(Debug, Clone)]
pub struct QuickSorter {
    pivot: PivotStrategy,
    ties: TiePlacement,
    max_depth: usize,
}

impl Default for QuickSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickSorter {
    /// First-element pivot, depth limit taken from [`config::max_partition_depth`].
    pub fn new() -> Self {
        Self {
            pivot: PivotStrategy::First,
            ties: TiePlacement::BeforePivot,
            max_depth: config::max_partition_depth(),
        }
    }

    pub fn with_pivot(mut self, pivot: PivotStrategy) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_ties(mut self, ties: TiePlacement) -> Self {
        self.ties = ties;
        self
    }

    /// Maximum partition depth before the sort is abandoned.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn pivot(&self) -> PivotStrategy {
        self.pivot
    }

    pub fn ties(&self) -> TiePlacement {
        self.ties
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
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
        let sorted = self.sort_entries(entries, &mut cmp)?;

        let stats = cmp.into_stats(Algorithm::Quick, items.len());
        debug!(
            records = stats.records,
            comparisons = stats.comparisons,
            max_depth = stats.max_depth,
            pivot = %self.pivot,
            "quick sort finished"
        );

        Ok((sorted, stats))
    }

    fn sort_entries<K, T>(&self, entries: Vec<(K, T)>, cmp: &mut Comparator) -> Result<Vec<T>>
    where
        K: PartialOrd + fmt::Debug,
    {
        let mut output = Vec::with_capacity(entries.len());
        let mut selector: PivotSelector = self.pivot.selector();
        let mut stack = vec![Task::Partition { entries, depth: 0 }];

        while let Some(task) = stack.pop() {
            let (mut entries, depth) = match task {
                Task::Emit(item) => {
                    output.push(item);
                    continue;
                }
                Task::Partition { entries, depth } => (entries, depth),
            };

            if entries.len() <= 1 {
                output.extend(entries.into_iter().map(|(_, item)| item));
                continue;
            }

            if depth > self.max_depth {
                warn!(
                    depth,
                    limit = self.max_depth,
                    "quick sort partition depth limit exceeded"
                );
                return Err(SortError::ResourceExhaustion {
                    depth,
                    limit: self.max_depth,
                });
            }
            cmp.observe_depth(depth);

            let pivot_index = selector.select(&entries, cmp)?;
            let (pivot_key, pivot_item) = entries.remove(pivot_index);

            let mut left = Vec::new();
            let mut right = Vec::new();
            for entry in entries {
                let goes_left = match self.ties {
                    TiePlacement::AfterPivot => cmp.less(&entry.0, &pivot_key)?,
                    TiePlacement::BeforePivot => cmp.less_eq(&entry.0, &pivot_key)?,
                };
                if goes_left {
                    left.push(entry);
                } else {
                    right.push(entry);
                }
            }

            // Popped in reverse: left, then pivot, then right.
            stack.push(Task::Partition {
                entries: right,
                depth: depth + 1,
            });
            stack.push(Task::Emit(pivot_item));
            stack.push(Task::Partition {
                entries: left,
                depth: depth + 1,
            });
        }

        Ok(output)
    }
}

/// Quick sort `items` by the key `extractor` produces, first-element pivot.
pub fn quick_sort<T, E>(items: &[T], extractor: &E) -> Result<Vec<T>>
where
    T: Clone,
    E: KeyExtractor<T>,
{
    QuickSorter::new().sort(items, extractor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{GenreKey, KeyFn};
    use crate::record::Record;

    fn song(title: &str, genres: &str) -> Record {
        Record::new().with("title", title).with("genres", genres)
    }

    fn titles(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("title").and_then(|v| v.as_str()).unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<Record> = Vec::new();
        assert!(quick_sort(&empty, &GenreKey::new()).unwrap().is_empty());

        let one = vec![song("A", "Rock")];
        assert_eq!(quick_sort(&one, &GenreKey::new()).unwrap(), one);
    }

    #[test]
    fn test_equal_keys_overtake_pivot() {
        let records = vec![song("A", "Pop"), song("B", "Jazz"), song("C", "Pop")];
        let sorted = quick_sort(&records, &GenreKey::new()).unwrap();
        assert_eq!(titles(&sorted), vec!["B", "C", "A"]);
        assert_eq!(QuickSorter::new().ties(), TiePlacement::BeforePivot);
    }

    #[test]
    fn test_ties_after_pivot_keep_input_order() {
        let records = vec![song("A", "Pop"), song("B", "Jazz"), song("C", "Pop")];
        let sorted = QuickSorter::new()
            .with_ties(TiePlacement::AfterPivot)
            .sort(&records, &GenreKey::new())
            .unwrap();
        assert_eq!(titles(&sorted), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_all_equal_keys() {
        let records: Vec<Record> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|t| song(t, "Soul"))
            .collect();

        // Each pass moves the pivot behind every equal key
        let sorted = quick_sort(&records, &GenreKey::new()).unwrap();
        assert_eq!(titles(&sorted), vec!["E", "D", "C", "B", "A"]);

        let stable = QuickSorter::new()
            .with_ties(TiePlacement::AfterPivot)
            .sort(&records, &GenreKey::new())
            .unwrap();
        assert_eq!(titles(&stable), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_tie_placement_from_str() {
        assert_eq!(TiePlacement::from_str("before"), Some(TiePlacement::BeforePivot));
        assert_eq!(TiePlacement::from_str("After"), Some(TiePlacement::AfterPivot));
        assert_eq!(TiePlacement::from_str("middle"), None);
    }

    #[test]
    fn test_sorts_multi_tag_keys() {
        let records = vec![
            song("A", "Rock, Pop"),
            song("B", "Rock"),
            song("C", "Blues"),
            song("D", ""),
        ];
        let sorted = quick_sort(&records, &GenreKey::new()).unwrap();
        assert_eq!(titles(&sorted), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_reversed_input_within_limit() {
        let values: Vec<u32> = (0..2_000).rev().collect();
        let (sorted, stats) = QuickSorter::new()
            .with_max_depth(5_000)
            .sort_with_stats(&values, &KeyFn::new(|v: &u32| *v))
            .unwrap();

        assert_eq!(sorted, (0..2_000).collect::<Vec<_>>());
        assert_eq!(stats.max_depth, 1_998);
    }

    #[test]
    fn test_depth_limit_exceeded() {
        let values: Vec<u32> = (0..50).collect();
        let err = QuickSorter::new()
            .with_max_depth(10)
            .sort(&values, &KeyFn::new(|v: &u32| *v))
            .unwrap_err();

        assert_eq!(err, SortError::ResourceExhaustion { depth: 11, limit: 10 });
    }

    #[test]
    fn test_median_of_three_handles_sorted_input() {
        let values: Vec<u32> = (0..1_000).collect();
        let (sorted, stats) = QuickSorter::new()
            .with_pivot(PivotStrategy::MedianOfThree)
            .with_max_depth(64)
            .sort_with_stats(&values, &KeyFn::new(|v: &u32| *v))
            .unwrap();

        assert_eq!(sorted, values);
        assert!(stats.max_depth < 64);
    }

    #[test]
    fn test_random_pivot_sorts() {
        let values: Vec<i64> = (0..500).map(|i| (i * 7919) % 503).collect();
        let mut expected = values.clone();
        expected.sort();

        let sorted = QuickSorter::new()
            .with_pivot(PivotStrategy::Random { seed: 42 })
            .with_max_depth(values.len())
            .sort(&values, &KeyFn::new(|v: &i64| *v))
            .unwrap();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_incomparable_keys_fail() {
        let values = vec![1.0, 2.0, f64::NAN];
        let err = quick_sort(&values, &KeyFn::new(|v: &f64| *v)).unwrap_err();
        assert!(matches!(err, SortError::KeyComparison { .. }));
    }
}
