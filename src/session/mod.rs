//! Session State
//!
//! The locally persisted login session: access token, user record and the
//! snapshot of the alarm that is currently ringing.
//!
//! Values are stored as strings under fixed keys, JSON-encoded where they
//! hold records. A record that fails to decode is reported as
//! [`SessionError::Malformed`] rather than silently dropped.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::sync::Arc;
use thiserror::Error;

use crate::api::{Alarm, AuthResponse, AuthUser};

pub const TOKEN_KEY: &str = "medireminder.token";
pub const USER_KEY: &str = "medireminder.user";
pub const CURRENT_ALARM_KEY: &str = "medireminder.current_alarm";

/// Errors from the session store
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is not the JSON it should be
    #[error("Malformed session value for {key}: {error}")]
    Malformed { key: String, error: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Typed view over the session key/value store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session kept only in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> SessionResult<Option<String>> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn set_token(&self, token: &str) -> SessionResult<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    pub fn user(&self) -> SessionResult<Option<AuthUser>> {
        self.read_json(USER_KEY)
    }

    pub fn set_user(&self, user: &AuthUser) -> SessionResult<()> {
        self.write_json(USER_KEY, user)
    }

    /// Store the token and user returned by login or signup
    pub fn establish(&self, auth: &AuthResponse) -> SessionResult<()> {
        self.set_token(&auth.access_token)?;
        self.set_user(&auth.user)?;
        tracing::info!(user_id = %auth.user.id, "Session established");
        Ok(())
    }

    pub fn current_alarm(&self) -> SessionResult<Option<Alarm>> {
        self.read_json(CURRENT_ALARM_KEY)
    }

    pub fn set_current_alarm(&self, alarm: &Alarm) -> SessionResult<()> {
        self.write_json(CURRENT_ALARM_KEY, alarm)
    }

    pub fn clear_current_alarm(&self) -> SessionResult<()> {
        self.store.remove(CURRENT_ALARM_KEY)
    }

    /// Log out: forget the token, the user and any stored alarm
    pub fn clear(&self) -> SessionResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        self.store.remove(CURRENT_ALARM_KEY)?;
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> SessionResult<Option<T>> {
        match self.store.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| SessionError::Malformed {
                    key: key.to_string(),
                    error: e.to_string(),
                }),
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) -> SessionResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RecordId, UserMetadata};

    fn sample_auth() -> AuthResponse {
        AuthResponse {
            access_token: "tok-123".to_string(),
            token_type: "bearer".to_string(),
            user: AuthUser {
                id: "u1".to_string(),
                email: Some("ada@example.com".to_string()),
                phone: None,
                user_metadata: UserMetadata {
                    full_name: Some("Ada Lovelace".to_string()),
                    joined: Some("Oct 2026".to_string()),
                    ..Default::default()
                },
            },
        }
    }

    #[test]
    fn test_establish_and_clear() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.establish(&sample_auth()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(session.user().unwrap().unwrap().display_name(), "Ada Lovelace");

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.user().unwrap().is_none());
    }

    #[test]
    fn test_current_alarm_snapshot() {
        let session = Session::in_memory();
        let alarm = Alarm {
            id: Some(RecordId::Int(5)),
            user_id: None,
            medication_name: "Aspirin".to_string(),
            dose: Some("81mg".to_string()),
            scheduled_time: "08:00".to_string(),
            status: None,
        };

        session.set_current_alarm(&alarm).unwrap();
        assert_eq!(session.current_alarm().unwrap(), Some(alarm));

        session.clear_current_alarm().unwrap();
        assert_eq!(session.current_alarm().unwrap(), None);
    }

    #[test]
    fn test_malformed_value() {
        let store = Arc::new(MemoryStore::new());
        store.set(CURRENT_ALARM_KEY, "{\"id\": ").unwrap();
        let session = Session::new(store);

        let err = session.current_alarm().unwrap_err();
        assert!(matches!(err, SessionError::Malformed { ref key, .. } if key == CURRENT_ALARM_KEY));
    }

    #[test]
    fn test_empty_token_is_no_session() {
        let session = Session::in_memory();
        session.set_token("").unwrap();
        assert!(!session.is_authenticated());
    }
}
