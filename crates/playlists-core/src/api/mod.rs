//! REST API client module for the playlists backend.
//!
//! This module provides the `ApiClient` for talking to the playlists API
//! with the bearer token held by a [`Session`](crate::auth::Session).
//!
//! Tokens are JWTs issued by the backend's `/auth/login` and
//! `/auth/register` endpoints.

pub mod auth;
pub mod client;
pub mod error;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
