// Image responses with unconditional no-store headers
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use crate::metrics;
use crate::workspace::OutputWorkspace;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::{debug, info, warn};

pub const CACHE_CONTROL_NO_STORE: &str = "no-cache, no-store, must-revalidate, max-age=0";
pub const PRAGMA_NO_CACHE: &str = "no-cache";
pub const EXPIRES_IMMEDIATELY: &str = "0";
/// Fixed far-past Last-Modified so any conditional request revalidates.
pub const LAST_MODIFIED_UNIX_EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Shown in place of an image deleted between page render and image request.
const UNAVAILABLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="240" viewBox="0 0 320 240"><rect width="320" height="240" fill="#eeeeee"/><text x="160" y="125" font-family="sans-serif" font-size="18" fill="#888888" text-anchor="middle">Image unavailable</text></svg>"##;

/// The four headers attached to every image response.
pub fn no_store_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_NO_STORE)),
        (header::PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE)),
        (header::EXPIRES, HeaderValue::from_static(EXPIRES_IMMEDIATELY)),
        (header::LAST_MODIFIED, HeaderValue::from_static(LAST_MODIFIED_UNIX_EPOCH)),
    ]
}

/// Content type from the file extension, falling back to octet-stream.
pub fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "png" => mime::IMAGE_PNG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "bmp" => mime::IMAGE_BMP.to_string(),
        "svg" => mime::IMAGE_SVG.to_string(),
        "webp" => "image/webp".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}

/// An image lookup result. Both variants render with no-store headers.
#[derive(Debug)]
pub enum ImageResponse {
    Found { bytes: Bytes, content_type: String },
    /// The file is gone, typically removed by a concurrent cleanup.
    Missing { filename: String },
}

impl ImageResponse {
    /// Read an image from the workspace.
    ///
    /// Anything that is not a readable regular file, including a directory or
    /// a file deleted mid-read, renders as the placeholder. Only a malformed
    /// name is an error.
    pub async fn load(workspace: &OutputWorkspace, filename: &str) -> Result<Self> {
        let path = workspace.image_path(filename)?;

        let read = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => tokio::fs::read(&path).await,
            Ok(_) => Err(io::Error::new(ErrorKind::NotFound, "not a regular file")),
            Err(e) => Err(e),
        };

        match read {
            Ok(data) => {
                debug!("Serving image {} ({} bytes)", filename, data.len());
                metrics::record_image_served();
                Ok(ImageResponse::Found {
                    bytes: Bytes::from(data),
                    content_type: content_type_for(&path),
                })
            }
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    info!("Image {} not available, serving placeholder", filename);
                } else {
                    warn!("Cannot read image {}: {}", filename, e);
                }
                metrics::record_image_missing();
                Ok(ImageResponse::Missing {
                    filename: filename.to_string(),
                })
            }
        }
    }
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        let (status, content_type, body) = match self {
            ImageResponse::Found {
                bytes,
                content_type,
            } => (StatusCode::OK, content_type, bytes),
            ImageResponse::Missing { filename } => {
                debug!("Rendering unavailable placeholder for {}", filename);
                (
                    StatusCode::NOT_FOUND,
                    mime::IMAGE_SVG.to_string(),
                    Bytes::from_static(UNAVAILABLE_SVG.as_bytes()),
                )
            }
        };

        let mut response = (status, body).into_response();
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        for (name, value) in no_store_headers() {
            headers.insert(name, value);
        }
        response
    }
}
