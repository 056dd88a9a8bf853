//! Check command implementation.
//!
//! Reports whether a dataset is already ordered by genre, without sorting it.

use crate::dataset::{read_records_from, DatasetError};
use crate::key::GenreKey;
use crate::validation::{verify_sorted, verify_sorted_file};
use std::io::Read;
use std::path::Path;

/// Check command configuration.
#[derive(Debug, Clone, Default)]
pub struct CheckCommand {
    extractor: GenreKey,
}

impl CheckCommand {
    pub fn new() -> Self {
        Self {
            extractor: GenreKey::new(),
        }
    }

    /// Use a custom genre field / delimiter.
    pub fn with_extractor(mut self, extractor: GenreKey) -> Self {
        self.extractor = extractor;
        self
    }

    /// Verify a dataset file. Returns the number of records checked.
    pub fn run<P: AsRef<Path>>(&self, input: P) -> Result<usize, DatasetError> {
        verify_sorted_file(input, &self.extractor)
    }

    /// Verify a dataset read from any reader (e.g. stdin).
    pub fn run_reader<R: Read>(&self, input: R) -> Result<usize, DatasetError> {
        let records = read_records_from(input)?;
        verify_sorted(&records, &self.extractor)?;
        Ok(records.len())
    }
}
