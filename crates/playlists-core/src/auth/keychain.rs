use keyring::Entry;
use tracing::debug;

use super::store::{SessionStore, StoreError};

/// Default keychain service name
pub const DEFAULT_SERVICE_NAME: &str = "playlists";

/// Session store backed by the OS keychain, one credential per key.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl SessionStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write and read back. A backend that accepts the write but does not
    /// keep it (keyring's mock fallback on unsupported platforms) is an error.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entry(key)?.set_password(value)?;
        match self.entry(key)?.get_password() {
            Ok(stored) if stored == value => {
                debug!(service = %self.service, key, "Stored keychain entry");
                Ok(())
            }
            Ok(_) | Err(keyring::Error::NoEntry) => Err(StoreError::Unavailable(format!(
                "keychain service '{}' did not retain '{}'",
                self.service, key
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyring_store_default_service() {
        assert_eq!(KeyringStore::default().service(), "playlists");
    }

    // Containers and CI often have no usable keychain; those runs only check
    // that the failure is reported rather than swallowed.

    #[test]
    fn test_keyring_store_missing_entry_is_absent() {
        let store = KeyringStore::new("playlists-test-missing");
        match store.get("token") {
            Ok(value) => {
                assert_eq!(value, None);
                assert!(store.remove("token").is_ok());
            }
            Err(e) => assert!(matches!(e, StoreError::Keyring(_))),
        }
    }

    #[test]
    fn test_keyring_store_set_then_get() {
        let store = KeyringStore::new(format!("playlists-test-{}", std::process::id()));
        match store.set("token", "abc") {
            Ok(()) => {
                assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
                store.set("token", "def").unwrap();
                assert_eq!(store.get("token").unwrap().as_deref(), Some("def"));
                store.remove("token").unwrap();
                assert_eq!(store.get("token").unwrap(), None);
            }
            Err(e) => assert!(matches!(e, StoreError::Keyring(_) | StoreError::Unavailable(_))),
        }
    }
}
