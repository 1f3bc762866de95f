// Delimited file loading for report pages
// Author: kelexine (https://github.com/kelexine)

use csv::ReaderBuilder;
use std::path::Path;

pub const TAB: u8 = b'\t';
pub const COMMA: u8 = b',';

/// A header row and its data rows, all as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Replace the file's header with display names of the same width.
    pub fn rename_columns(mut self, names: &[&str]) -> Result<Self, String> {
        if names.len() != self.columns.len() {
            return Err(format!(
                "expected {} columns, found {}",
                names.len(),
                self.columns.len()
            ));
        }
        self.columns = names.iter().map(|n| n.to_string()).collect();
        Ok(self)
    }
}

/// Outcome of reading one report file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLoad {
    Missing,
    /// Zero bytes, or a header with no data rows.
    Empty,
    Loaded(DataTable),
    Failed(String),
}

/// Read a delimited file whose first line is a header.
///
/// Every record must have as many fields as the header.
pub fn read_table(path: &Path, delimiter: u8) -> TableLoad {
    if !path.exists() {
        return TableLoad::Missing;
    }

    let mut reader = match ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => return TableLoad::Failed(e.to_string()),
    };

    let columns: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_string).collect(),
        Err(e) => return TableLoad::Failed(e.to_string()),
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => return TableLoad::Failed(e.to_string()),
        }
    }

    if rows.is_empty() {
        return TableLoad::Empty;
    }
    TableLoad::Loaded(DataTable { columns, rows })
}
