//! Command implementations for tunesort.

pub mod check;
pub mod similar;
pub mod sort;

pub use check::CheckCommand;
pub use similar::SimilarCommand;
pub use sort::{SortCommand, SortMode, SortOutput, SortedRun};
