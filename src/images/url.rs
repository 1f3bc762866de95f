// Epoch-versioned image URLs
// Author: kelexine (https://github.com/kelexine)

use crate::session::SessionState;

/// Route prefix under which result images are served.
pub const IMAGES_ROUTE: &str = "/images";

/// Query parameter carrying the cache epoch.
pub const EPOCH_PARAM: &str = "v";

/// `/images/<filename>?v=<epoch>` with the filename percent-encoded.
pub fn versioned_url(filename: &str, epoch: u64) -> String {
    format!(
        "{}/{}?{}={}",
        IMAGES_ROUTE,
        urlencoding::encode(filename),
        EPOCH_PARAM,
        epoch
    )
}

/// Builds image URLs for one page render.
///
/// The epoch is read on every call rather than captured at construction, so a
/// builder created before an invalidation still emits the new value.
pub struct UrlBuilder<'a> {
    session: &'a SessionState,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(session: &'a SessionState) -> Self {
        Self { session }
    }

    pub fn image_url(&self, filename: &str) -> String {
        versioned_url(filename, self.session.current_epoch())
    }
}
