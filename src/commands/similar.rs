//! Similar command implementation.
//!
//! Builds the genre graph from a dataset and lists the songs nearest to a
//! start genre, one name per line.

use crate::dataset::DatasetError;
use crate::graph::{
    GenreGraph, Node, Traversal, DEFAULT_NAME_FIELD, DEFAULT_SIMILAR_LIMIT, DEFAULT_START_GENRE,
};
use crate::key::GenreKey;
use crate::record::Record;
use std::io::{BufWriter, Write};
use tracing::warn;

/// Similar command configuration.
#[derive(Debug, Clone)]
pub struct SimilarCommand {
    /// Genre the search starts from
    pub start: String,
    /// Visiting order
    pub traversal: Traversal,
    /// Maximum number of songs listed
    pub limit: usize,
    extractor: GenreKey,
    name_field: String,
}

impl Default for SimilarCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarCommand {
    pub fn new() -> Self {
        Self {
            start: DEFAULT_START_GENRE.to_string(),
            traversal: Traversal::BreadthFirst,
            limit: DEFAULT_SIMILAR_LIMIT,
            extractor: GenreKey::new(),
            name_field: DEFAULT_NAME_FIELD.to_string(),
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Use a custom genre field / delimiter.
    pub fn with_extractor(mut self, extractor: GenreKey) -> Self {
        self.extractor = extractor;
        self
    }

    /// Field holding each song's name.
    pub fn with_name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = field.into();
        self
    }

    /// Song names similar to the start genre, nearest first.
    pub fn similar(&self, records: &[Record]) -> Result<Vec<String>, DatasetError> {
        let graph = GenreGraph::from_records(records, &self.extractor, &self.name_field)?;
        if !graph.contains(&Node::genre(self.start.as_str())) {
            warn!(start = %self.start, "start genre not found in dataset");
        }

        Ok(graph
            .similar_songs(&self.start, self.traversal, self.limit)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Write similar song names to `output`. Returns the number written.
    pub fn run<W: Write>(&self, records: &[Record], output: &mut W) -> Result<usize, DatasetError> {
        let songs = self.similar(records)?;

        let mut buf_output = BufWriter::new(output);
        for song in &songs {
            writeln!(buf_output, "{}", song)?;
        }
        buf_output.flush()?;

        Ok(songs.len())
    }
}
