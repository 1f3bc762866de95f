//! Tabular views over the pipeline's TSV and CSV outputs.
//!
//! Each report reads one file from the output workspace and turns it into a
//! [`TableReport`]: a title plus either a table or a message explaining why
//! there is nothing to show. Missing, empty and unreadable files all render as
//! a page, never as an HTTP error.
//!
//! # Components
//!
//! - `table`: delimited file loading.
//! - `outputs`: the collocation, inverted index, error set and knowledge-base
//!   reports, and the per-file status list.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod outputs;
mod table;

pub use outputs::{
    collocations_report, csk_graph_report, error_set_report, file_statuses,
    inverted_index_report, FileStatus, TableReport, NO_ERRORS_MESSAGE,
};
pub use table::{read_table, DataTable, TableLoad, COMMA, TAB};
