//! Public `/auth` endpoints: obtaining a session in the first place.

use reqwest::{Response, StatusCode};
use tracing::info;

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};

use super::{ApiClient, ApiError};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";
const PROFILE_ENDPOINT: &str = "/api/profile";

impl ApiClient {
    /// Exchange email and password for a token and store the new session.
    ///
    /// A rejected password is [`ApiError::InvalidCredentials`]; any session
    /// already stored is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.resolve_url(LOGIN_ENDPOINT)?;
        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let auth = Self::check_auth_response(response).await?;
        self.session.set_auth(&auth.token, &auth.user)?;
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth)
    }

    /// Create an account and store the session the server hands back
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = self.resolve_url(REGISTER_ENDPOINT)?;
        let response = self.client.post(url).json(request).send().await?;

        let auth = Self::check_auth_response(response).await?;
        self.session.set_auth(&auth.token, &auth.user)?;
        info!(user_id = auth.user.id, "Registered and logged in");
        Ok(auth)
    }

    /// Current user as the server sees it
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get_json(PROFILE_ENDPOINT).await
    }

    async fn check_auth_response(response: Response) -> Result<AuthResponse, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ApiError::from_status(status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("auth response: {}", e)))
    }
}
