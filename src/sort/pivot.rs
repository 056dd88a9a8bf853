//! Pivot selection for [`QuickSorter`](super::QuickSorter).

use super::{Comparator, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// How the quick sort picks its pivot.
///
/// Only [`PivotStrategy::First`] with
/// [`TiePlacement::AfterPivot`](super::TiePlacement::AfterPivot) keeps equal
/// keys in input order. The other strategies can move equal-keyed elements
/// that precede the pivot behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotStrategy {
    /// First element of the partition. Quadratic on sorted or reversed input.
    #[default]
    First,
    /// Median of the first, middle and last keys.
    MedianOfThree,
    /// Uniformly random index from a seeded generator.
    Random { seed: u64 },
}

impl PivotStrategy {
    /// Parse strategy from string. `random` uses seed 0.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first" => Some(Self::First),
            "median3" | "median-of-three" | "median_of_three" => Some(Self::MedianOfThree),
            "random" => Some(Self::Random { seed: 0 }),
            _ => None,
        }
    }

    /// Replace the seed of a `Random` strategy; other strategies are unchanged.
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            Self::Random { .. } => Self::Random { seed },
            other => other,
        }
    }

    pub(crate) fn selector(&self) -> PivotSelector {
        match *self {
            Self::First => PivotSelector::First,
            Self::MedianOfThree => PivotSelector::MedianOfThree,
            Self::Random { seed } => PivotSelector::Random(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl fmt::Display for PivotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::MedianOfThree => f.write_str("median3"),
            Self::Random { seed } => write!(f, "random(seed={})", seed),
        }
    }
}

/// Per-sort pivot state. One selector lives for a whole sort so the random
/// sequence is reproducible from the seed.
pub(crate) enum PivotSelector {
    First,
    MedianOfThree,
    Random(SmallRng),
}

impl PivotSelector {
    /// Index of the pivot within `entries` (`entries.len() >= 2`).
    pub(crate) fn select<K, T>(&mut self, entries: &[(K, T)], cmp: &mut Comparator) -> Result<usize>
    where
        K: PartialOrd + fmt::Debug,
    {
        match self {
            Self::First => Ok(0),
            Self::MedianOfThree => median_of_three(entries, cmp),
            Self::Random(rng) => Ok(rng.gen_range(0..entries.len())),
        }
    }
}

fn median_of_three<K, T>(entries: &[(K, T)], cmp: &mut Comparator) -> Result<usize>
where
    K: PartialOrd + fmt::Debug,
{
    let mut idx = [0, entries.len() / 2, entries.len() - 1];
    let key = |i: usize| &entries[i].0;

    if cmp.less(key(idx[1]), key(idx[0]))? {
        idx.swap(0, 1);
    }
    if cmp.less(key(idx[2]), key(idx[1]))? {
        idx.swap(1, 2);
        if cmp.less(key(idx[1]), key(idx[0]))? {
            idx.swap(0, 1);
        }
    }

    Ok(idx[1])
}
