//! API client for communicating with the playlists REST API.
//!
//! This module provides the `ApiClient` struct, which attaches the stored
//! bearer token to outgoing requests and turns a 401 into session expiry.

use reqwest::{header, Client, Method, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::Session;
use crate::config::Config;

use super::ApiError;

/// Per-call overrides for [`ApiClient::request`].
///
/// Headers set here replace the defaults of the same name; they are not
/// merged value by value.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: header::HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: header::HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: header::HeaderName, value: header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from raw strings, e.g. parsed from user input
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = header::HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = header::HeaderValue::from_str(value.trim())
            .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
        Ok(self.header(name, value))
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        Ok(self.body(serde_json::to_vec(body)?))
    }
}

/// API client for the playlists backend.
/// Clone is cheap - reqwest::Client and Session are both reference counted.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) session: Session,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client. No request timeout is set; that policy
    /// belongs to the caller.
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url, session))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>, session: Session) -> Self {
        Self {
            client,
            session,
            base_url: base_url.into(),
        }
    }

    /// Client for the configured API URL and session store
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let session = Session::from_arc(config.open_store()?);
        Ok(Self::new(config.api_url.clone(), session)?)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL
    pub(super) fn resolve_url(&self, url: &str) -> Result<Url, ApiError> {
        let full = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        };
        Url::parse(&full).map_err(|_| ApiError::InvalidUrl(full))
    }

    fn default_headers(token: &str) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidHeader("stored token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        Ok(headers)
    }

    /// Send an authenticated request.
    ///
    /// Fails with [`ApiError::MissingCredential`] before touching the network
    /// when no token is stored. A 401 clears the stored session and yields
    /// [`ApiError::Expired`]. Every other status is handed back untouched.
    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<Response, ApiError> {
        let token = self.session.token().ok_or(ApiError::MissingCredential)?;
        let url = self.resolve_url(url)?;

        let mut headers = Self::default_headers(&token)?;
        // Extending a HeaderMap replaces existing names, so caller headers win
        headers.extend(options.headers);

        let method = options.method;
        debug!(%method, %url, "Sending authenticated request");

        let mut builder = self.client.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(%method, %url, "Server rejected token, clearing session");
            if let Err(e) = self.session.clear_auth() {
                warn!(error = %e, "Failed to clear expired session");
            }
            return Err(ApiError::Expired);
        }

        debug!(%method, %url, status = %response.status(), "Response received");
        Ok(response)
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.request(url, RequestOptions::new()).await?;
        Self::parse_json(response).await
    }

    /// Send a JSON body with `method` and parse the JSON reply
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let options = RequestOptions::new().method(method).json(body)?;
        let response = self.request(url, options).await?;
        Self::parse_json(response).await
    }

    /// DELETE a resource, ignoring any reply body
    pub async fn delete(&self, url: &str) -> Result<(), ApiError> {
        let response = self
            .request(url, RequestOptions::new().method(Method::DELETE))
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await?;
            Err(ApiError::unexpected_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::unexpected_status(status, &text));
        }
        // 204 and friends carry no body
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
