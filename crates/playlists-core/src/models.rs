//! Request and response bodies for the playlists `/auth` endpoints.
//!
//! Field names follow the backend's snake_case JSON. The password is never
//! part of `UserProfile`; the backend does not send it.

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// The user record stored alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

impl UserProfile {
    /// "First Last", falling back to the email when both names are blank
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body returned by both login and register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse<U = UserProfile> {
    pub token: String,
    pub user: U,
}
