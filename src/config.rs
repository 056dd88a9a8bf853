//! Global configuration for tunesort runtime behavior.
//!
//! Process-wide defaults set once at startup (normally from CLI flags) and
//! read when sorters and writers are constructed. Per-instance builder
//! methods override them.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default partition depth limit for the quick sort.
///
/// Depth only grows past `log2(n)` on adversarial input; reversed input of
/// `n` records reaches `n - 2`.
pub const DEFAULT_MAX_PARTITION_DEPTH: usize = 100_000;

/// Default number of rows rendered by the table writer.
pub const DEFAULT_DISPLAY_ROWS: usize = 10;

static MAX_PARTITION_DEPTH: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_PARTITION_DEPTH);
static DISPLAY_ROWS: AtomicUsize = AtomicUsize::new(DEFAULT_DISPLAY_ROWS);

/// Set the partition depth limit used by newly created quick sorters.
///
/// # Example
///
/// ```
/// use tunesort::config;
///
/// config::set_max_partition_depth(512);
/// assert_eq!(config::max_partition_depth(), 512);
/// config::set_max_partition_depth(config::DEFAULT_MAX_PARTITION_DEPTH);
/// ```
#[inline]
pub fn set_max_partition_depth(depth: usize) {
    MAX_PARTITION_DEPTH.store(depth, Ordering::Release);
}

/// Current default partition depth limit.
#[inline]
pub fn max_partition_depth() -> usize {
    MAX_PARTITION_DEPTH.load(Ordering::Acquire)
}

/// Set the number of rows newly created table writers render.
#[inline]
pub fn set_display_rows(rows: usize) {
    DISPLAY_ROWS.store(rows, Ordering::Release);
}

/// Current default table row limit.
#[inline]
pub fn display_rows() -> usize {
    DISPLAY_ROWS.load(Ordering::Acquire)
}
