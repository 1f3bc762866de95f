// Report definitions for each pipeline output file
// Author: kelexine (https://github.com/kelexine)

use super::table::{read_table, DataTable, TableLoad, COMMA, TAB};
use crate::config::StorageConfig;
use crate::workspace::OutputSummary;
use serde::Serialize;
use std::path::Path;
use tracing::error;

pub const NO_ERRORS_MESSAGE: &str =
    "All objects were detected correctly as per the commonsense KB rules. No errors found.";

/// What a report page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub title: String,
    pub table: Option<DataTable>,
    pub error: Option<String>,
}

impl TableReport {
    fn table(title: &str, table: DataTable) -> Self {
        Self {
            title: title.to_string(),
            table: Some(table),
            error: None,
        }
    }

    fn message(title: &str, error: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            table: None,
            error: Some(error.into()),
        }
    }
}

/// Per-file messages and display columns for one output.
struct ReportSpec {
    title: &'static str,
    /// Display names replacing the file's header, if any.
    columns: Option<&'static [&'static str]>,
    missing: &'static str,
    empty: &'static str,
    /// Prefix for read failures, followed by the underlying error.
    failed: &'static str,
}

const COLLOCATIONS: ReportSpec = ReportSpec {
    title: "Collocations Map",
    columns: Some(&["Inferred spatial relation on predicted bounding boxes", "Frequency"]),
    missing: "The collocations.tsv output file is missing. This file contains spatial relationship data between detected objects. Please run a search first to generate this file.",
    empty: "The collocations file exists but contains no data. This might indicate that no spatial relationships were detected in the processed images.",
    failed: "Error loading collocations file",
};

const INVERTED_INDEX: ReportSpec = ReportSpec {
    title: "Inverted Index",
    columns: Some(&["Inferred spatial relation on predicted bounding boxes", "Image ID"]),
    missing: "The inverted_index.tsv output file is missing. This file contains the mapping between spatial relationships and image IDs. Please run a search first to generate this file.",
    empty: "The inverted index file exists but contains no data. This might indicate that no spatial relationships were detected in the processed images.",
    failed: "Error loading inverted index file",
};

const ERROR_SET: ReportSpec = ReportSpec {
    title: "Error Set",
    columns: Some(&[
        "Image ID",
        "Inferred Spatial Relation on Predicted Bounding Boxes",
        "Expected Spatial Relation between these objects present in KB",
    ]),
    missing: "No error set data available. Please run a search first to generate output files and error analysis.",
    empty: "The error set file exists but contains no data. This might indicate that no errors were detected during processing.",
    failed: "Error loading error set file",
};

const CSK_GRAPH: ReportSpec = ReportSpec {
    title: "Common Sense Knowledge Graph",
    columns: None,
    missing: "The KB-CSK-SNIFFER.csv file is missing. This file contains the commonsense knowledge base that the system uses for analysis.",
    empty: "The KB file exists but contains no data. This might indicate that the knowledge base is empty or corrupted.",
    failed: "Error loading KB file",
};

fn build(spec: &ReportSpec, path: &Path, delimiter: u8) -> TableReport {
    let loaded = match read_table(path, delimiter) {
        TableLoad::Loaded(table) => match spec.columns {
            Some(names) => table.rename_columns(names),
            None => Ok(table),
        },
        TableLoad::Missing => return TableReport::message(spec.title, spec.missing),
        TableLoad::Empty => return TableReport::message(spec.title, spec.empty),
        TableLoad::Failed(e) => Err(e),
    };

    match loaded {
        Ok(table) => TableReport::table(spec.title, table),
        Err(e) => {
            error!("{} {}: {}", spec.failed, path.display(), e);
            TableReport::message(spec.title, format!("{}: {}", spec.failed, e))
        }
    }
}

pub fn collocations_report(storage: &StorageConfig) -> TableReport {
    build(&COLLOCATIONS, &storage.collocations_file(), TAB)
}

pub fn inverted_index_report(storage: &StorageConfig) -> TableReport {
    build(&INVERTED_INDEX, &storage.inverted_index_file(), TAB)
}

/// The error set. A finished search that wrote no error file found no errors,
/// which is shown as a success row rather than a missing-file message.
pub fn error_set_report(storage: &StorageConfig, has_any_output: bool) -> TableReport {
    if !storage.error_file.exists() && has_any_output {
        let table = DataTable::new(
            &["Status", "Message"],
            vec![vec!["SUCCESS".to_string(), NO_ERRORS_MESSAGE.to_string()]],
        );
        return TableReport::table("Error Set - No Errors Detected", table);
    }
    build(&ERROR_SET, &storage.error_file, TAB)
}

pub fn csk_graph_report(storage: &StorageConfig) -> TableReport {
    build(&CSK_GRAPH, &storage.kb_file, COMMA)
}

/// Presence of one output on the output status page.
#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub exists: bool,
    pub name: String,
    pub description: String,
}

pub fn file_statuses(storage: &StorageConfig, summary: &OutputSummary) -> Vec<FileStatus> {
    let status = |exists: bool, name: String, description: &str| FileStatus {
        exists,
        name,
        description: description.to_string(),
    };

    vec![
        status(
            storage.collocations_file().exists(),
            "Collocations Map (collocations.tsv)".to_string(),
            "Contains spatial relationship data between detected objects",
        ),
        status(
            storage.inverted_index_file().exists(),
            "Inverted Index (inverted_index.tsv)".to_string(),
            "Contains mapping between spatial relationships and image IDs",
        ),
        status(
            summary.has_error_file,
            "Error Set (error_set.tsv)".to_string(),
            "Contains detected errors in object relationships",
        ),
        status(
            summary.images_count > 0,
            format!("Processed Images ({} files)", summary.images_count),
            "Downloaded and processed images from the search",
        ),
    ]
}
