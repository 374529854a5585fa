//! Authentication module for persisting the logged-in session.
//!
//! This module provides:
//! - `Session`: stateless accessor over the `token` and `user` entries
//! - `SessionStore`: the key-value capability a backend must offer
//! - `MemoryStore`, `FileStore`, `KeyringStore`: the bundled backends
//!
//! A session is the pair (token, user). Nothing is cached in memory; every
//! read goes back to the store.

pub mod file;
pub mod keychain;
pub mod memory;
pub mod session;
pub mod store;

pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;
pub use session::{AuthStatus, Session, SessionData, SessionError, TOKEN_KEY, USER_KEY};
pub use store::{SessionStore, StoreError};
