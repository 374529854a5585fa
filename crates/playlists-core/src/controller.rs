//! Page-level auth guards.
//!
//! `Session` and `ApiClient` only report what happened. `AuthController`
//! pairs them with a [`Navigator`] and performs the redirects: to
//! [`LOGIN_PATH`] on logout or expiry, and to [`ROOT_PATH`] when a logged-in
//! user opens a public-only page.

use std::sync::Arc;

use reqwest::Response;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, RequestOptions};
use crate::auth::{AuthStatus, Session};
use crate::navigation::{Navigator, LOGIN_PATH, ROOT_PATH};

#[derive(Clone)]
pub struct AuthController {
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl AuthController {
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Authenticated request; an expired session also sends the user to the
    /// login page before the error is returned.
    pub async fn api_request(&self, url: &str, options: RequestOptions) -> Result<Response, ApiError> {
        self.observe(self.api.request(url, options).await)
    }

    /// Pass `result` through, redirecting to login first if it reports an
    /// expired session. Use this around the typed `ApiClient` helpers.
    pub fn observe<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::Expired) = result {
            self.navigator.redirect(LOGIN_PATH);
        }
        result
    }

    /// Drop the local session and go to the login page. The server is not
    /// told.
    pub fn logout(&self) {
        if let Err(e) = self.session().clear_auth() {
            warn!(error = %e, "Failed to clear session on logout");
        }
        info!("Logged out");
        self.navigator.redirect(LOGIN_PATH);
    }

    /// Guard for protected pages: false (and a redirect to login) when no
    /// session is stored.
    pub fn require_auth(&self) -> bool {
        match self.session().status() {
            AuthStatus::Authenticated => true,
            AuthStatus::Anonymous => {
                debug!("No session, redirecting to login");
                self.navigator.redirect(LOGIN_PATH);
                false
            }
        }
    }

    /// Guard for public-only pages such as login itself: true (and a
    /// redirect to the root) when a session is already stored.
    pub fn redirect_if_authenticated(&self) -> bool {
        match self.session().status() {
            AuthStatus::Authenticated => {
                debug!("Already logged in, redirecting to root");
                self.navigator.redirect(ROOT_PATH);
                true
            }
            AuthStatus::Anonymous => false,
        }
    }
}
