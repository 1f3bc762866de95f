//! On-disk outputs of the detection pipeline.
//!
//! The pipeline writes annotated images, per-image CSV detections, TSV
//! collocation data and an error set into fixed locations. This module owns
//! those locations: it lists result images for the gallery, reports what
//! exists for the status page, resolves request filenames safely, and clears
//! everything between searches.
//!
//! # Components
//!
//! - `cleanup`: best-effort removal of the previous search's outputs.
//! - `gallery`: ordered listing of result images.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod cleanup;
mod gallery;

pub use cleanup::{Cleanup, CleanupReport};
pub use gallery::GalleryImage;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File counts shown on the status page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputSummary {
    pub images_count: usize,
    pub csv_files_count: usize,
    pub tsv_files_count: usize,
    pub has_error_file: bool,
    pub has_any_output: bool,
}

pub struct OutputWorkspace {
    storage: StorageConfig,
}

impl OutputWorkspace {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Create the output directories if they are missing.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.storage.images_dir,
            &self.storage.csv_dir,
            &self.storage.tsv_dir,
        ] {
            fs::create_dir_all(dir)?;
            info!("Ensured directory exists: {}", dir.display());
        }
        Ok(())
    }

    /// Map a requested image name to a path inside the images directory.
    ///
    /// Only bare file names are accepted; anything that could escape the
    /// directory is rejected before touching the disk.
    pub fn image_path(&self, filename: &str) -> Result<PathBuf> {
        let invalid = filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0']);
        if invalid {
            return Err(AppError::InvalidFilename(filename.to_string()));
        }
        Ok(self.storage.images_dir.join(filename))
    }

    pub(crate) fn is_image(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    self.storage
                        .image_extensions
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(ext))
                })
                .unwrap_or(false)
    }

    pub fn summary(&self) -> OutputSummary {
        let images_count = self.list_images().len();
        let csv_files_count = count_with_extension(&self.storage.csv_dir, "csv");
        let tsv_files_count = count_with_extension(&self.storage.tsv_dir, "tsv");
        let has_error_file = self.storage.error_file.exists();

        OutputSummary {
            images_count,
            csv_files_count,
            tsv_files_count,
            has_error_file,
            has_any_output: self.has_any_output(),
        }
    }

    /// Whether anything from a previous search is still on disk.
    pub fn has_any_output(&self) -> bool {
        self.storage.collocations_file().exists()
            || self.storage.inverted_index_file().exists()
            || self.storage.error_file.exists()
            || fs::read_dir(&self.storage.images_dir)
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(false)
    }
}

fn count_with_extension(dir: &Path, wanted: &str) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| ext.eq_ignore_ascii_case(wanted))
                        .unwrap_or(false)
                })
                .count()
        })
        .unwrap_or(0)
}
