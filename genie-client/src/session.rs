//! Session context: created at login, read by every request, cleared on
//! logout or on a 401.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// The JWT payload fields the backend sets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
        }
    }

    /// Decode the token payload. The signature is not checked; the server does that.
    pub fn claims(&self) -> Result<Claims> {
        let payload = self
            .token
            .split('.')
            .nth(1)
            .context("token is not a JWT (missing payload segment)")?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .context("decode JWT payload")?;
        serde_json::from_slice(&bytes).context("parse JWT claims")
    }

    pub fn user_id(&self) -> Result<String> {
        Ok(self.claims()?.sub)
    }

    /// True when the token carries an `exp` in the past. Tokens without `exp` never expire here.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.claims()
            .ok()
            .and_then(|c| c.exp)
            .is_some_and(|exp| exp <= now.timestamp())
    }
}

/// Where the session lives between invocations.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store, used by tests and one-shot callers.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn fake_token(sub: &str, exp: Option<i64>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let mut claims = serde_json::json!({ "sub": sub, "email": "sam@example.com" });
    if let Some(exp) = exp {
        claims["exp"] = exp.into();
    }
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_id_from_token() {
        let s = Session::new(fake_token("3f2a9c1e-0000-4000-8000-000000000001", None), None);
        assert_eq!(s.user_id().unwrap(), "3f2a9c1e-0000-4000-8000-000000000001");
        assert_eq!(s.claims().unwrap().email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn test_garbage_token() {
        assert!(Session::new("not-a-jwt", None).user_id().is_err());
        assert!(Session::new("a.!!!.c", None).user_id().is_err());
    }

    #[test]
    fn test_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let past = Session::new(fake_token("u", Some(now.timestamp() - 1)), None);
        let future = Session::new(fake_token("u", Some(now.timestamp() + 3600)), None);
        let never = Session::new(fake_token("u", None), None);
        assert!(past.is_expired(now));
        assert!(!future.is_expired(now));
        assert!(!never.is_expired(now));
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load().unwrap(), None);
        let s = Session::new("t", Some("a@b.c".to_string()));
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), Some(s));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
