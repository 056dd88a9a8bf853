//! Plain-text table preview of records.
//!
//! Renders the first rows of a dataset the way a data-frame preview does:
//! an index column, one column per field (union over all records, first-seen
//! order), and a trailing `[N rows x M columns]` shape line.

use crate::config;
use crate::record::Record;
use rustc_hash::FxHashSet;
use serde_json::Value;
use std::io::{self, Write};

/// Default cap on rendered cell width.
pub const DEFAULT_MAX_WIDTH: usize = 40;

const ELLIPSIS: &str = "...";
const COLUMN_GAP: &str = "  ";

/// Table renderer configuration.
#[derive(Debug, Clone)]
pub struct TableWriter {
    limit: usize,
    max_width: usize,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter {
    /// Row limit taken from [`config::display_rows`].
    pub fn new() -> Self {
        Self {
            limit: config::display_rows(),
            max_width: DEFAULT_MAX_WIDTH,
        }
    }

    /// Maximum number of rows rendered.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Maximum cell width in characters; longer cells end in `...`.
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width.max(ELLIPSIS.len() + 1);
        self
    }

    /// Render the table to a string.
    pub fn render(&self, records: &[Record]) -> String {
        let columns = collect_columns(records);
        let shown = &records[..records.len().min(self.limit)];

        let mut header = vec![String::new()];
        header.extend(columns.iter().map(|c| self.truncate(c)));

        let rows: Vec<Vec<String>> = shown
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut row = vec![i.to_string()];
                row.extend(
                    columns
                        .iter()
                        .map(|c| self.truncate(&render_cell(record.get(c)))),
                );
                row
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, &header, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
        if shown.len() < records.len() {
            out.push_str(ELLIPSIS);
            out.push('\n');
        }
        out.push_str(&format!(
            "[{} rows x {} columns]\n",
            records.len(),
            columns.len()
        ));
        out
    }

    /// Render the table into a writer.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W, records: &[Record]) -> io::Result<()> {
        writer.write_all(self.render(records).as_bytes())
    }

    fn truncate(&self, cell: &str) -> String {
        if cell.chars().count() <= self.max_width {
            return cell.to_string();
        }
        let kept: String = cell.chars().take(self.max_width - ELLIPSIS.len()).collect();
        kept + ELLIPSIS
    }
}

fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut columns = Vec::new();
    for record in records {
        for name in record.field_names() {
            if seen.insert(name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(&format!("{:<width$}", cell, width = *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, genres: &str) -> Record {
        Record::new().with("title", title).with("genres", genres)
    }

    #[test]
    fn test_render_basic() {
        let records = vec![song("Creep", "Rock"), song("Hello", "Pop, Soul")];
        let table = TableWriter::new().with_limit(10).render(&records);

        let expected = concat!(
            "   title  genres\n",
            "0  Creep  Rock\n",
            "1  Hello  Pop, Soul\n",
            "[2 rows x 2 columns]\n",
        );
        assert_eq!(table, expected);
    }

    #[test]
    fn test_union_of_columns_and_missing_cells() {
        let records = vec![
            Record::new().with("title", "A"),
            Record::new().with("title", "B").with("plays", 12),
        ];
        let table = TableWriter::new().with_limit(10).render(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "   title  plays");
        assert_eq!(lines[1], "0  A");
        assert_eq!(lines[2], "1  B      12");
    }

    #[test]
    fn test_limit_and_shape() {
        let records: Vec<Record> = (0..5).map(|i| song(&format!("S{}", i), "Jazz")).collect();
        let table = TableWriter::new().with_limit(2).render(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5); // header + 2 rows + ellipsis + shape
        assert_eq!(lines[3], "...");
        assert_eq!(lines[4], "[5 rows x 2 columns]");
    }

    #[test]
    fn test_truncate_long_cells() {
        let records = vec![song("A very long song title indeed", "Rock")];
        let table = TableWriter::new()
            .with_limit(10)
            .with_max_width(10)
            .render(&records);

        assert!(table.contains("A very ..."));
        assert!(!table.contains("indeed"));
    }

    #[test]
    fn test_empty() {
        let table = TableWriter::new().render(&[]);
        assert_eq!(table, "\n[0 rows x 0 columns]\n");
    }
}
