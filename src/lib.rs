// Clippy allows for the whole crate
#![allow(clippy::should_implement_trait)]

//! tunesort: rank song records by genre.
//!
//! This library sorts in-memory song records by a key derived from their
//! genre tags, using one of two textbook comparison sorts.
//!
//! # Features
//!
//! - **Two algorithms**: top-down merge sort and first-pivot quick sort,
//!   each with documented tie behavior
//! - **Pluggable keys**: any [`key::KeyExtractor`], genre splitting by default
//! - **Bounded depth**: quick sort runs off a heap work stack and fails with a
//!   typed error instead of overflowing on adversarial input
//! - **Genre graph**: breadth- or depth-first search from a genre to find
//!   related songs
//!
//! # Example
//!
//! ```rust,no_run
//! use tunesort::{dataset, key::GenreKey, sort::{merge_sort, quick_sort}};
//!
//! let songs = dataset::read_records("songs.json").unwrap();
//!
//! let by_merge = merge_sort(&songs, &GenreKey::new()).unwrap();
//! let by_quick = quick_sort(&songs, &GenreKey::new()).unwrap();
//! assert_eq!(by_merge.len(), by_quick.len());
//! ```

pub mod commands;
pub mod config;
pub mod dataset;
pub mod display;
pub mod graph;
pub mod key;
pub mod record;
pub mod sort;
pub mod validation;

// Re-export commonly used types
pub use dataset::{read_records, write_records, DatasetError, OutputFormat};
pub use graph::{GenreGraph, Traversal};
pub use key::{GenreKey, KeyExtractor, KeyFn, SortKey};
pub use record::Record;
pub use sort::{merge_sort, quick_sort, SortError, SortStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{CheckCommand, SimilarCommand, SortCommand, SortMode};
    pub use crate::dataset::{parse_records, read_records, write_records, OutputFormat};
    pub use crate::display::TableWriter;
    pub use crate::graph::{GenreGraph, Node, Traversal};
    pub use crate::key::{GenreKey, KeyExtractor, KeyFn, SortKey};
    pub use crate::record::Record;
    pub use crate::sort::{
        merge_sort, quick_sort, MergeSorter, PivotStrategy, QuickSorter, SortError, SortStats,
        TiePlacement,
    };
    pub use crate::validation::verify_sorted;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::dataset::parse_records;
        use crate::key::GenreKey;
        use crate::sort::merge_sort;
        use crate::validation::verify_sorted;

        let content = r#"[{"genres": "Rock"}, {"genres": "Pop"}, {}]"#;
        let songs = parse_records(content).unwrap();

        let sorted = merge_sort(&songs, &GenreKey::new()).unwrap();

        assert_eq!(sorted.len(), 3);
        assert!(sorted[0].get("genres").is_none());
        assert!(verify_sorted(&sorted, &GenreKey::new()).is_ok());
    }

    #[test]
    fn test_both_sorters_workflow() {
        use crate::dataset::parse_records;
        use crate::key::GenreKey;
        use crate::sort::{merge_sort, quick_sort};

        let content = "{\"genres\": \"Jazz\"}\n{\"genres\": \"Blues\"}\n";
        let songs = parse_records(content).unwrap();

        let merged = merge_sort(&songs, &GenreKey::new()).unwrap();
        let quick = quick_sort(&songs, &GenreKey::new()).unwrap();

        assert_eq!(merged, quick);
        assert_eq!(merged[0].get("genres").and_then(|v| v.as_str()), Some("Blues"));
    }
}
