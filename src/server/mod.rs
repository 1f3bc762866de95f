//! Axum-based HTTP server implementation for csk-sniffer.
//!
//! This module sets up the HTTP server, attaches a session to every browser
//! request, and exposes the search, gallery, image and cache-control
//! endpoints.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints (search, results, images, clear_cache, status).
//! - `middleware`: Request ID tracking and the session cookie layer.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{ClearCacheResponse, REFRESHED_HOME};
pub use routes::{create_router, AppState};
