//! Core library for the playlists client.
//!
//! This crate holds everything a front end needs to talk to the playlists
//! API as a logged-in user:
//!
//! - [`auth`]: the `Session` accessor and its pluggable key-value stores
//! - [`api`]: the bearer-token `ApiClient`, login/register, typed errors
//! - [`controller`]: page-level guards that turn outcomes into navigation
//! - [`navigation`]: the `Navigator` seam and the fixed route paths
//! - [`config`]: API base URL and storage backend selection
//! - [`models`]: request/response bodies shared with the backend
//! - [`token`]: display-only inspection of JWT claims

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod models;
pub mod navigation;
pub mod token;

#[cfg(feature = "web")]
pub mod web;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{AuthStatus, FileStore, KeyringStore, MemoryStore, Session, SessionData, SessionStore};
pub use config::{Config, StoreKind};
pub use controller::AuthController;
pub use navigation::{Navigator, RecordingNavigator, LOGIN_PATH, ROOT_PATH};
