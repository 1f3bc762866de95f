// In-memory session store keyed by cookie id
// Author: kelexine (https://github.com/kelexine)

use super::epoch::CacheEpoch;
use crate::config::SessionConfig;
use crate::metrics;
use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Server-side state owned by one browser session.
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    epoch: CacheEpoch,
    search: RwLock<SearchInfo>,
}

/// The search currently associated with a session.
#[derive(Debug, Clone, Default)]
pub struct SearchInfo {
    pub query: Option<String>,
    pub search_id: Option<String>,
}

impl SessionState {
    fn new(baseline_epoch: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            epoch: CacheEpoch::new(baseline_epoch),
            search: RwLock::new(SearchInfo::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch.current_epoch()
    }

    /// Only the invalidation trigger should call this.
    pub(crate) fn advance_epoch(&self) -> u64 {
        self.epoch.advance_epoch()
    }

    pub fn search(&self) -> SearchInfo {
        self.search.read().clone()
    }

    /// Record a newly submitted query and return its search id.
    pub fn begin_search(&self, query: &str) -> String {
        let search_id = format!("search_{}", Uuid::new_v4().simple());
        let mut search = self.search.write();
        search.query = Some(query.to_string());
        search.search_id = Some(search_id.clone());
        search_id
    }
}

/// How a request's session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// The cookie referred to a live session.
    Existing,
    /// No cookie was sent.
    NoCookie,
    /// The cookie was malformed, expired or evicted.
    UnknownSession,
}

impl SessionOrigin {
    pub fn is_new(self) -> bool {
        self != SessionOrigin::Existing
    }

    fn as_label(self) -> &'static str {
        match self {
            SessionOrigin::Existing => "existing",
            SessionOrigin::NoCookie => "no_cookie",
            SessionOrigin::UnknownSession => "unknown_session",
        }
    }
}

/// Bounded store of live sessions. Evicting a session ends its lifecycle,
/// including its cache epoch.
pub struct SessionStore {
    sessions: Mutex<LruCache<Uuid, Arc<SessionState>>>,
    baseline_epoch: u64,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            baseline_epoch: config.baseline_epoch,
        }
    }

    /// Look up the session named by a cookie value, creating a fresh one at
    /// the baseline epoch when there is none.
    pub fn resolve(&self, cookie_value: Option<&str>) -> (Arc<SessionState>, SessionOrigin) {
        let origin = match cookie_value {
            None => SessionOrigin::NoCookie,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => {
                    if let Some(session) = self.get(&id) {
                        return (session, SessionOrigin::Existing);
                    }
                    SessionOrigin::UnknownSession
                }
                Err(_) => SessionOrigin::UnknownSession,
            },
        };

        let session = self.create();
        debug!(
            "Created session {} ({})",
            session.id(),
            origin.as_label()
        );
        metrics::record_session_created(origin.as_label());
        (session, origin)
    }

    fn create(&self) -> Arc<SessionState> {
        let session = Arc::new(SessionState::new(self.baseline_epoch));
        let mut sessions = self.sessions.lock();
        if let Some((evicted, _)) = sessions.push(session.id(), session.clone()) {
            if evicted != session.id() {
                info!("Session store full, ended least recently used session {}", evicted);
            }
        }
        metrics::update_active_sessions(sessions.len());
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<SessionState>> {
        self.sessions.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_capacity(max_sessions: usize) -> SessionStore {
        SessionStore::new(&SessionConfig {
            max_sessions,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn test_first_visit_gets_baseline_epoch() {
        let store = store_with_capacity(10);
        let (session, origin) = store.resolve(None);

        assert_eq!(origin, SessionOrigin::NoCookie);
        assert_eq!(session.current_epoch(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_existing_cookie_returns_same_session() {
        let store = store_with_capacity(10);
        let (session, _) = store.resolve(None);
        session.advance_epoch();

        let cookie = session.id().to_string();
        let (again, origin) = store.resolve(Some(&cookie));

        assert_eq!(origin, SessionOrigin::Existing);
        assert_eq!(again.id(), session.id());
        assert_eq!(again.current_epoch(), 2);
    }

    #[test]
    fn test_garbage_cookie_starts_fresh_session() {
        let store = store_with_capacity(10);
        let (session, origin) = store.resolve(Some("not-a-uuid"));

        assert_eq!(origin, SessionOrigin::UnknownSession);
        assert_eq!(session.current_epoch(), 1);
    }

    #[test]
    fn test_evicted_session_is_treated_as_first_visit() {
        let store = store_with_capacity(1);
        let (session, _) = store.resolve(None);
        session.advance_epoch();
        // A second visitor pushes the first out of a one-slot store
        let _ = store.resolve(None);

        let (fresh, origin) = store.resolve(Some(&session.id().to_string()));
        assert_eq!(origin, SessionOrigin::UnknownSession);
        assert_ne!(fresh.id(), session.id());
        assert_eq!(fresh.current_epoch(), 1);
    }

    #[test]
    fn test_least_recently_used_session_is_evicted() {
        let store = store_with_capacity(2);
        let (first, _) = store.resolve(None);
        let (second, _) = store.resolve(None);

        // Touch the first so the second becomes the eviction candidate
        assert!(store.get(&first.id()).is_some());
        let (_third, _) = store.resolve(None);

        assert_eq!(store.len(), 2);
        assert!(store.get(&first.id()).is_some());
        assert!(store.get(&second.id()).is_none());
    }

    #[test]
    fn test_begin_search_records_query() {
        let store = store_with_capacity(10);
        let (session, _) = store.resolve(None);

        let search_id = session.begin_search("kids on boat");
        let info = session.search();

        assert_eq!(info.query.as_deref(), Some("kids on boat"));
        assert_eq!(info.search_id.as_deref(), Some(search_id.as_str()));
        assert!(search_id.starts_with("search_"));
    }
}
