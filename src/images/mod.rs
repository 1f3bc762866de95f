//! Result image delivery.
//!
//! Image URLs carry the session's cache epoch (`?v=<epoch>`) so that every
//! invalidation produces URLs the browser has never seen. Independently, every
//! image response forbids caching outright, whatever the query string says.
//!
//! # Components
//!
//! - `serve`: file lookup, content type and the no-store response headers.
//! - `url`: epoch-versioned URL construction for page renders.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod serve;
mod url;

pub use serve::{
    content_type_for, no_store_headers, ImageResponse, CACHE_CONTROL_NO_STORE,
    EXPIRES_IMMEDIATELY, LAST_MODIFIED_UNIX_EPOCH, PRAGMA_NO_CACHE,
};
pub use url::{versioned_url, UrlBuilder, EPOCH_PARAM, IMAGES_ROUTE};
