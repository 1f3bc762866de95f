// Best-effort removal of the previous search's outputs
// Author: kelexine (https://github.com/kelexine)

use super::OutputWorkspace;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Deletes whatever a previous search left on disk.
///
/// Implementations must not stop at the first failure: every file that can be
/// removed is removed, and failures are reported back.
pub trait Cleanup: Send + Sync {
    fn purge_previous_search(&self) -> CleanupReport;
}

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, path: PathBuf, result: io::Result<()>) {
        match result {
            Ok(()) => {
                info!("Deleted {}", path.display());
                self.removed.push(path);
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", path.display(), e);
                self.failed.push((path, e.to_string()));
            }
        }
    }
}

impl Cleanup for OutputWorkspace {
    fn purge_previous_search(&self) -> CleanupReport {
        let storage = self.storage();
        let mut report = CleanupReport::default();

        // Images and any per-search subdirectories
        for path in entries(&storage.images_dir, &mut report) {
            if path.is_dir() {
                report.record(path.clone(), fs::remove_dir_all(&path));
            } else if self.is_image(&path) {
                report.record(path.clone(), fs::remove_file(&path));
            }
        }

        for path in entries(&storage.csv_dir, &mut report) {
            if path.is_file() && has_extension(&path, "csv") {
                report.record(path.clone(), fs::remove_file(&path));
            }
        }

        for path in entries(&storage.tsv_dir, &mut report) {
            if path.is_file() && has_extension(&path, "tsv") {
                report.record(path.clone(), fs::remove_file(&path));
            }
        }

        if storage.error_file.exists() {
            report.record(storage.error_file.clone(), fs::remove_file(&storage.error_file));
        }

        info!(
            "Cleanup finished: {} removed, {} failed",
            report.removed.len(),
            report.failed.len()
        );
        report
    }
}

/// Directory listing that treats a missing directory as empty.
fn entries(dir: &Path, report: &mut CleanupReport) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            report.failed.push((dir.to_path_buf(), e.to_string()));
            Vec::new()
        }
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}
