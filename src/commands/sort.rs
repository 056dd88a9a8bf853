//! Sort command implementation.
//!
//! Sorts a loaded dataset by genre with the merge sorter, the quick sorter or
//! both, and writes the result. Output is only written once every sorter has
//! succeeded.
//!
//! Tie behavior differs between the algorithms:
//! - merge: equal keys are emitted right-half first (input order not kept)
//! - quick (first pivot): equal keys that follow the pivot move ahead of it,
//!   unless the sorter is built with `TiePlacement::AfterPivot`

use crate::dataset::{write_atomically, write_records, DatasetError, OutputFormat};
use crate::display::TableWriter;
use crate::key::{GenreKey, KeyExtractor};
use crate::record::Record;
use crate::sort::{Algorithm, MergeSorter, QuickSorter, SortError, SortStats};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Buffer size for output (256KB)
const BUF_SIZE: usize = 256 * 1024;

/// Which sorter(s) to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Merge,
    Quick,
    /// Run both sorters on the same input
    Both,
}

impl SortMode {
    /// Parse mode from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "merge" => Some(Self::Merge),
            "quick" => Some(Self::Quick),
            "both" | "all" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Records produced by one sorter, with its statistics.
#[derive(Debug, Clone)]
pub struct SortedRun {
    pub records: Vec<Record>,
    pub stats: SortStats,
}

/// Result of a sort command.
#[derive(Debug, Clone, Default)]
pub struct SortOutput {
    pub merge: Option<SortedRun>,
    pub quick: Option<SortedRun>,
}

impl SortOutput {
    /// Statistics of every sorter that ran, merge first.
    pub fn stats(&self) -> Vec<SortStats> {
        self.merge
            .iter()
            .chain(self.quick.iter())
            .map(|run| run.stats.clone())
            .collect()
    }
}

#[derive(Serialize)]
struct BothRuns<'a> {
    merge: &'a [Record],
    quick: &'a [Record],
}

/// One JSON Lines row when both sorters write to the same stream.
#[derive(Serialize)]
struct TaggedRecord<'a> {
    algorithm: Algorithm,
    record: &'a Record,
}

/// Sort command configuration.
#[derive(Debug, Clone)]
pub struct SortCommand {
    /// Which sorter(s) to run
    pub mode: SortMode,
    /// Output format
    pub format: OutputFormat,
    extractor: GenreKey,
    merge: MergeSorter,
    quick: QuickSorter,
    table: TableWriter,
}

impl Default for SortCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SortCommand {
    pub fn new() -> Self {
        Self {
            mode: SortMode::Merge,
            format: OutputFormat::Json,
            extractor: GenreKey::new(),
            merge: MergeSorter::new(),
            quick: QuickSorter::new(),
            table: TableWriter::new(),
        }
    }

    pub fn with_mode(mut self, mode: SortMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Use a custom genre field / delimiter.
    pub fn with_extractor(mut self, extractor: GenreKey) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a configured quick sorter (pivot strategy, depth limit).
    pub fn with_quick_sorter(mut self, quick: QuickSorter) -> Self {
        self.quick = quick;
        self
    }

    pub fn with_table(mut self, table: TableWriter) -> Self {
        self.table = table;
        self
    }

    pub fn extractor(&self) -> &GenreKey {
        &self.extractor
    }

    /// Sort records with the configured sorter(s).
    ///
    /// In [`SortMode::Both`] the two sorters run in parallel on the same
    /// borrowed input. Either failing fails the whole command.
    pub fn sort(&self, records: &[Record]) -> Result<SortOutput, SortError> {
        let merge_run = || -> Result<SortedRun, SortError> {
            let (records, stats) = self.merge.sort_with_stats(records, &self.extractor)?;
            Ok(SortedRun { records, stats })
        };
        let quick_run = || -> Result<SortedRun, SortError> {
            let (records, stats) = self.quick.sort_with_stats(records, &self.extractor)?;
            Ok(SortedRun { records, stats })
        };

        match self.mode {
            SortMode::Merge => Ok(SortOutput {
                merge: Some(merge_run()?),
                quick: None,
            }),
            SortMode::Quick => Ok(SortOutput {
                merge: None,
                quick: Some(quick_run()?),
            }),
            SortMode::Both => {
                let (merge, quick) = rayon::join(merge_run, quick_run);
                Ok(SortOutput {
                    merge: Some(merge?),
                    quick: Some(quick?),
                })
            }
        }
    }

    /// Write sorted output in the configured format.
    pub fn write_output<W: Write>(
        &self,
        output: &SortOutput,
        writer: &mut W,
    ) -> Result<(), DatasetError> {
        match (&output.merge, &output.quick) {
            (Some(merge), Some(quick)) => self.write_both(&merge.records, &quick.records, writer),
            (Some(run), None) | (None, Some(run)) => self.write_run(&run.records, writer),
            (None, None) => Ok(()),
        }
    }

    fn write_run<W: Write>(&self, records: &[Record], writer: &mut W) -> Result<(), DatasetError> {
        match self.format {
            OutputFormat::Table => self.table.write(writer, records)?,
            format => write_records(writer, records, format)?,
        }
        Ok(())
    }

    fn write_both<W: Write>(
        &self,
        merge: &[Record],
        quick: &[Record],
        writer: &mut W,
    ) -> Result<(), DatasetError> {
        let field = self.extractor.field();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, &BothRuns { merge, quick })?;
                writeln!(writer)?;
            }
            OutputFormat::JsonLines => {
                let runs = [(Algorithm::Merge, merge), (Algorithm::Quick, quick)];
                for (algorithm, records) in runs {
                    for record in records {
                        serde_json::to_writer(&mut *writer, &TaggedRecord { algorithm, record })?;
                        writeln!(writer)?;
                    }
                }
            }
            OutputFormat::Table => {
                writeln!(writer, "Merge sorted by {}", field)?;
                self.table.write(writer, merge)?;
                writeln!(writer)?;
                writeln!(writer, "Quick sorted by {}", field)?;
                self.table.write(writer, quick)?;
            }
        }
        Ok(())
    }

    /// Sort `records` and write the result to `output` (e.g. stdout).
    pub fn run<W: Write>(
        &self,
        records: &[Record],
        output: &mut W,
    ) -> Result<Vec<SortStats>, DatasetError> {
        let sorted = self.sort(records)?;

        let mut buf_output = BufWriter::with_capacity(BUF_SIZE, output);
        self.write_output(&sorted, &mut buf_output)?;
        buf_output.flush()?;

        Ok(sorted.stats())
    }

    /// Sort `records` and write the result to a file.
    ///
    /// Nothing is created when the sort fails, and `path` may name the file
    /// the records were loaded from.
    pub fn run_to_path<P: AsRef<Path>>(
        &self,
        records: &[Record],
        path: P,
    ) -> Result<Vec<SortStats>, DatasetError> {
        let sorted = self.sort(records)?;
        write_atomically(path, |writer| self.write_output(&sorted, writer))?;
        Ok(sorted.stats())
    }
}

/// Sort keys of `records` in output order, for reporting and tests.
pub fn keys_of<E: KeyExtractor<Record>>(
    records: &[Record],
    extractor: &E,
) -> Result<Vec<E::Key>, SortError> {
    records.iter().map(|r| extractor.extract(r)).collect()
}
