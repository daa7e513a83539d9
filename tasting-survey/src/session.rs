//! Server-side sessions keyed by a cookie.
//!
//! Each browser gets a random id in the `tasting_session` cookie. A
//! [`Session`] is only stored once that browser posts the form; it then lives
//! here behind its own async mutex so one submission per session runs at a
//! time. Sessions that never submitted are evicted after sitting idle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, header::COOKIE};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::controller::Session;

pub const SESSION_COOKIE: &str = "tasting_session";

/// How long an unsubmitted session survives without requests.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

pub type SessionHandle = Arc<Mutex<Session>>;

/// A stored session and whether the client still needs its cookie.
pub struct ResolvedSession {
    pub id: Uuid,
    pub handle: SessionHandle,
    pub needs_cookie: bool,
}

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: DashMap<Uuid, Entry>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    /// The stored session for `id`, if there is one. Never creates.
    pub fn find(&self, id: Option<Uuid>) -> Option<SessionHandle> {
        let mut entry = self.sessions.get_mut(&id?)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.handle))
    }

    /// The session a submit runs against. Created under the cookie's id when
    /// that id is unknown (e.g. after a restart or eviction), or under a fresh
    /// id when the request carried none.
    pub fn open(&self, id: Option<Uuid>) -> ResolvedSession {
        let needs_cookie = id.is_none();
        let id = id.unwrap_or_else(Uuid::new_v4);

        let mut entry = self.sessions.entry(id).or_insert_with(|| {
            debug!(%id, "New session");
            Entry {
                handle: SessionHandle::default(),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();

        ResolvedSession {
            id,
            handle: Arc::clone(&entry.handle),
            needs_cookie,
        }
    }

    /// Drop sessions that never submitted and were idle longer than the TTL.
    /// Busy and submitted sessions stay. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| {
            if now.saturating_duration_since(entry.last_seen) < self.idle_ttl {
                return true;
            }
            match entry.handle.try_lock() {
                Ok(session) => session.is_submitted(),
                Err(_) => true,
            }
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// The session id carried in the request's cookies, if any parses.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
