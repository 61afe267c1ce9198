use crate::session::Session;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sitegen_session";

/// Browser sessions keyed by cookie. Idle sessions are evicted, which is
/// the only way a session ends.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Mutex<Session>>>,
}

pub struct SessionHandle {
    pub id: Uuid,
    pub session: Arc<Mutex<Session>>,
    is_new: bool,
}

impl SessionStore {
    pub const DEFAULT_IDLE: Duration = Duration::from_secs(60 * 60);
    const MAX_SESSIONS: u64 = 10_000;

    pub fn new(idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(Self::MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Returns the session named by the request cookie, or starts a new one.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        if let Some(id) = session_id(headers) {
            if let Some(session) = self.sessions.get(&id) {
                return SessionHandle {
                    id,
                    session,
                    is_new: false,
                };
            }
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions.insert(id, session.clone());
        tracing::debug!(%id, "started session");
        SessionHandle {
            id,
            session,
            is_new: true,
        }
    }
}

impl SessionHandle {
    /// Wraps a rendered page, issuing the cookie for sessions started by this request.
    pub fn respond(&self, page: String) -> Response {
        let mut response = Html(page).into_response();
        if self.is_new {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(SET_COOKIE, value);
            }
        }
        response
    }
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|id| Uuid::parse_str(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reuses_session_from_cookie() {
        let store = SessionStore::new(SessionStore::DEFAULT_IDLE);
        let first = store.resolve(&HeaderMap::new());
        assert!(first.is_new);

        let headers = cookie_headers(&format!("theme=dark; {}={}", SESSION_COOKIE, first.id));
        let second = store.resolve(&headers);

        assert!(!second.is_new);
        assert_eq!(second.id, first.id);
        assert!(Arc::ptr_eq(&first.session, &second.session));
    }

    #[test]
    fn unknown_or_garbled_cookie_starts_fresh() {
        let store = SessionStore::new(SessionStore::DEFAULT_IDLE);
        let stale = Uuid::new_v4();

        let handle = store.resolve(&cookie_headers(&format!("{}={}", SESSION_COOKIE, stale)));
        assert!(handle.is_new);
        assert_ne!(handle.id, stale);

        assert!(store.resolve(&cookie_headers("sitegen_session=nope")).is_new);
    }

    #[test]
    fn new_session_sets_cookie() {
        let store = SessionStore::new(SessionStore::DEFAULT_IDLE);
        let handle = store.resolve(&HeaderMap::new());
        let response = handle.respond("<p>ok</p>".to_string());

        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("{}={}", SESSION_COOKIE, handle.id)));
    }
}
