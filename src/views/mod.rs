//! HTML pages rendered with askama templates from `templates/`.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::images::UrlBuilder;
use crate::reports::{DataTable, FileStatus, TableReport};
use crate::session::SessionState;
use crate::workspace::{OutputSummary, OutputWorkspace};
use askama::Template;

pub const REFRESHED_MESSAGE: &str =
    "Previous search files have been cleared. You can now perform a new search.";
pub const RELOADED_MESSAGE: &str = "Images reloaded with a fresh cache key.";
pub const NO_IMAGES_MESSAGE: &str =
    "No processed images available. Please run a search first to download and process images.";

#[derive(Template)]
#[template(path = "search_page.html")]
pub struct SearchPage {
    pub has_results: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// A gallery entry with its URL already versioned for this render.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub filename: String,
    pub caption: String,
    pub url: String,
}

#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage {
    pub query: Option<String>,
    pub images: Vec<RenderedImage>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ResultsPage {
    /// Assemble the gallery for `session`, reading its epoch now.
    pub fn build(session: &SessionState, workspace: &OutputWorkspace, refreshed: bool) -> Self {
        let urls = UrlBuilder::new(session);
        let images: Vec<RenderedImage> = workspace
            .list_images()
            .into_iter()
            .map(|image| RenderedImage {
                url: urls.image_url(&image.filename),
                filename: image.filename,
                caption: image.caption,
            })
            .collect();

        let error = images.is_empty().then(|| NO_IMAGES_MESSAGE.to_string());

        Self {
            query: session.search().query,
            images,
            message: refreshed.then(|| RELOADED_MESSAGE.to_string()),
            error,
        }
    }
}

/// Landing page after a search, linking to every output view.
#[derive(Template)]
#[template(path = "home_page.html")]
pub struct HomePage {
    pub query: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl HomePage {
    pub fn build(session: &SessionState) -> Self {
        Self {
            query: session.search().query,
            message: None,
            error: None,
        }
    }
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutPage {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// One pipeline output rendered as an HTML table.
#[derive(Template)]
#[template(path = "table.html")]
pub struct TablePage {
    pub title: String,
    pub table: Option<DataTable>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl From<TableReport> for TablePage {
    fn from(report: TableReport) -> Self {
        Self {
            title: report.title,
            table: report.table,
            message: None,
            error: report.error,
        }
    }
}

#[derive(Template)]
#[template(path = "output_status.html")]
pub struct OutputStatusPage {
    pub current_query: String,
    pub cache_buster: u64,
    pub summary: OutputSummary,
    pub files: Vec<FileStatus>,
    pub message: Option<String>,
    pub error: Option<String>,
}
