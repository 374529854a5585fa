use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::store::{SessionStore, StoreError};

/// Storage key holding the raw bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user record
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session storage: {0}")]
    Store(#[from] StoreError),

    #[error("User record cannot be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Whether a session is currently stored. Presence only; token freshness is
/// the server's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Anonymous,
}

/// A full (token, user) pair read back from storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData<U> {
    pub token: String,
    pub user: U,
}

/// Stateless accessor over the `token` and `user` entries of a
/// [`SessionStore`].
///
/// Clone is cheap and every clone sees the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Stored bearer token, if any.
    ///
    /// Never fails: an unreadable store is logged and reported as absent, and
    /// an empty token counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read token from session storage");
                None
            }
        }
    }

    /// Stored user record, if any.
    ///
    /// Text that does not deserialize into `U` is removed from storage and
    /// reported as absent.
    pub fn user<U: DeserializeOwned>(&self) -> Option<U> {
        let text = match self.store.get(USER_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read user from session storage");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user record is corrupt, clearing it");
                if let Err(e) = self.store.remove(USER_KEY) {
                    warn!(error = %e, "Failed to clear corrupt user record");
                }
                None
            }
        }
    }

    /// Both halves of the session, or `None` if either is missing
    pub fn load<U: DeserializeOwned>(&self) -> Option<SessionData<U>> {
        let token = self.token()?;
        let user = self.user()?;
        Some(SessionData { token, user })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }

    /// Store a new session, replacing any previous one. No validation of
    /// either value is performed.
    pub fn set_auth<U: Serialize + ?Sized>(&self, token: &str, user: &U) -> Result<(), SessionError> {
        // Serialize first so a bad record never leaves a token behind alone
        let user = serde_json::to_string(user)?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user)?;
        debug!("Session stored");
        Ok(())
    }

    /// Remove both entries. Safe to call with no session stored.
    pub fn clear_auth(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use crate::models::UserProfile;
    use serde_json::json;

    fn profile() -> UserProfile {
        UserProfile {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_set_auth_then_read_returns_same_pair() {
        let session = Session::new(MemoryStore::new());
        session.set_auth("abc", &profile()).unwrap();

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.user::<UserProfile>(), Some(profile()));
        assert_eq!(
            session.load::<UserProfile>(),
            Some(SessionData { token: "abc".to_string(), user: profile() })
        );
    }

    #[test]
    fn test_set_auth_overwrites_previous_session() {
        let session = Session::new(MemoryStore::new());
        session.set_auth("first", &json!({"id": 1})).unwrap();
        session.set_auth("second", &json!({"id": 2})).unwrap();

        assert_eq!(session.token().as_deref(), Some("second"));
        assert_eq!(session.user::<serde_json::Value>(), Some(json!({"id": 2})));
    }

    #[test]
    fn test_clear_auth_removes_both_entries() {
        let session = Session::new(MemoryStore::new());
        session.set_auth("abc", &profile()).unwrap();
        session.clear_auth().unwrap();

        assert_eq!(session.token(), None);
        assert_eq!(session.user::<UserProfile>(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear_auth_is_idempotent() {
        let session = Session::new(MemoryStore::new());
        assert!(session.clear_auth().is_ok());
        assert!(session.clear_auth().is_ok());
    }

    #[test]
    fn test_is_authenticated_tracks_token_presence() {
        let session = Session::new(MemoryStore::new());
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), AuthStatus::Anonymous);

        session.set_auth("abc", &json!(null)).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.status(), AuthStatus::Authenticated);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "").unwrap();
        let session = Session::from_arc(store);
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_corrupt_user_is_cleared_and_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(USER_KEY, "{not json").unwrap();
        let session = Session::from_arc(store.clone());

        assert_eq!(session.user::<serde_json::Value>(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        // The token is left alone
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_clones_share_storage() {
        let session = Session::new(MemoryStore::new());
        let other = session.clone();
        session.set_auth("abc", &json!({})).unwrap();
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_unserializable_user_leaves_storage_untouched() {
        use std::collections::HashMap;

        let session = Session::new(MemoryStore::new());
        let mut bad: HashMap<(i32, i32), i32> = HashMap::new();
        bad.insert((1, 2), 3);

        assert!(matches!(session.set_auth("abc", &bad), Err(SessionError::Serialize(_))));
        assert!(!session.is_authenticated());
    }
}
