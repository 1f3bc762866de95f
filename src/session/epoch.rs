//! Session-scoped cache epoch.
//!
//! The epoch is appended to every rendered image URL as `?v=<epoch>`. Each
//! invalidation event advances it by exactly one, so URLs rendered after the
//! event never match anything the browser cached before it.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic per-session counter used as a cache-busting query parameter.
///
/// Requests for the same session can run concurrently (several tabs), so the
/// increment is a single atomic `fetch_add`: two concurrent advances always
/// produce two distinct values.
#[derive(Debug)]
pub struct CacheEpoch {
    value: AtomicU64,
}

impl CacheEpoch {
    pub fn new(baseline: u64) -> Self {
        Self {
            value: AtomicU64::new(baseline),
        }
    }

    /// Value to embed in URLs rendered right now.
    pub fn current_epoch(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Advance by one and return the new value.
    pub fn advance_epoch(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }
}
