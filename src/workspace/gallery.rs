// Ordered listing of result images
// Author: kelexine (https://github.com/kelexine)

use super::OutputWorkspace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use tracing::warn;

/// Pipeline outputs are named "Image <n>.<ext>"
static IMAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Image\s*(\d+)").unwrap());

/// One result image as shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub filename: String,
    /// 1-based position in the gallery.
    pub index: usize,
    pub caption: String,
}

impl OutputWorkspace {
    /// Result images ordered by the number in their name. Files without a
    /// number come first, ordered by name.
    pub fn list_images(&self) -> Vec<GalleryImage> {
        let dir = &self.storage().images_dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Error loading images from {}: {}", dir.display(), e);
                }
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| self.is_image(path))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();

        names.sort_by(|a, b| image_number(a).cmp(&image_number(b)).then_with(|| a.cmp(b)));

        names
            .into_iter()
            .enumerate()
            .map(|(i, filename)| GalleryImage {
                filename,
                index: i + 1,
                caption: format!("Image {}", i + 1),
            })
            .collect()
    }
}

fn image_number(filename: &str) -> u64 {
    IMAGE_NUMBER
        .captures(filename)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}
