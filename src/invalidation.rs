//! Cache invalidation triggers.
//!
//! Both triggers advance the session's cache epoch exactly once. A new search
//! first clears the previous search's files; a manual clear only advances the
//! epoch, for when the files on disk are right but the browser still shows an
//! old copy.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::metrics;
use crate::session::SessionState;
use crate::workspace::{Cleanup, CleanupReport};
use tracing::{info, warn};

/// What caused previously rendered image URLs to become untrustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    NewSearch,
    ClearCache,
}

impl InvalidationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidationReason::NewSearch => "new_search",
            InvalidationReason::ClearCache => "clear_cache",
        }
    }
}

/// Result of one invalidation event, returned so the caller can redirect.
#[derive(Debug, Clone)]
pub struct Invalidation {
    pub reason: InvalidationReason,
    /// Epoch after the event.
    pub epoch: u64,
    /// Present only for new searches.
    pub cleanup: Option<CleanupReport>,
}

/// Clear the previous search's outputs, then advance the epoch once.
///
/// Deletion failures are logged and reported but never prevent the epoch
/// advance: briefly visible stale files are preferable to a blocked search.
pub fn start_new_search(session: &SessionState, cleaner: &dyn Cleanup) -> Invalidation {
    let report = cleaner.purge_previous_search();
    metrics::record_cleanup(report.removed.len(), report.failed.len());
    if !report.is_clean() {
        warn!(
            "Session {}: {} file(s) could not be deleted, continuing with new search",
            session.id(),
            report.failed.len()
        );
    }

    let epoch = advance(session, InvalidationReason::NewSearch);
    Invalidation {
        reason: InvalidationReason::NewSearch,
        epoch,
        cleanup: Some(report),
    }
}

/// Advance the epoch without touching any files.
pub fn clear_browser_cache(session: &SessionState) -> Invalidation {
    let epoch = advance(session, InvalidationReason::ClearCache);
    Invalidation {
        reason: InvalidationReason::ClearCache,
        epoch,
        cleanup: None,
    }
}

fn advance(session: &SessionState, reason: InvalidationReason) -> u64 {
    let epoch = session.advance_epoch();
    metrics::record_epoch_advance(reason.as_str());
    info!(
        "Session {}: cache epoch advanced to {} ({})",
        session.id(),
        epoch,
        reason.as_str()
    );
    epoch
}
