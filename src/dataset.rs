//! Dataset loading and saving.
//!
//! A dataset is either a JSON array of objects or JSON Lines (one object per
//! line). Both are detected automatically on load.

use crate::display::TableWriter;
use crate::record::Record;
use crate::sort::SortError;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading, writing or sorting a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Sort(#[from] SortError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Buffer size for file output (256KB)
const BUF_SIZE: usize = 256 * 1024;

/// Output format for sorted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One compact JSON object per line
    JsonLines,
    /// Plain-text preview table
    Table,
}

impl OutputFormat {
    /// Parse format from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" | "json-lines" => Some(Self::JsonLines),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

/// Parse records from a string (array or JSON Lines).
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::Object(map) => Ok(Record::from(map)),
                other => Err(DatasetError::InvalidFormat(format!(
                    "element {} is not an object: {}",
                    i, other
                ))),
            })
            .collect();
    }

    let mut records = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| DatasetError::Parse {
            line: i + 1,
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => records.push(Record::from(map)),
            other => {
                return Err(DatasetError::Parse {
                    line: i + 1,
                    message: format!("Expected a JSON object, got {}", other),
                })
            }
        }
    }

    Ok(records)
}

/// Read all records from a reader.
pub fn read_records_from<R: Read>(mut reader: R) -> Result<Vec<Record>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_records(&content)
}

/// Read all records from a file.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let records = parse_records(&content)?;
    debug!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// Write records to a writer in the given format.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[Record],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Table => TableWriter::new().write(writer, records)?,
    }
    Ok(())
}

/// Write a file through a temporary sibling, replacing `path` only after
/// `write` succeeds.
///
/// On error the temporary file is removed and `path` is left untouched, so a
/// destination that is also the input is never truncated.
pub fn write_atomically<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut io::BufWriter<&mut fs::File>) -> Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    {
        let mut writer = io::BufWriter::with_capacity(BUF_SIZE, tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), "wrote output");
    Ok(())
}
