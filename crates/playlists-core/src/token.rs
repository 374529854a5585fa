//! Read-only view of the claims inside a stored JWT.
//!
//! The signature is not checked and nothing here decides whether the user is
//! logged in; the server remains the only judge of a token's validity. This
//! exists so front ends can show "session ends in 3h".

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::auth::Session;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry as seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `header.payload.signature`.
    /// Anything that is not a JWT yields `None`.
    pub fn decode(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp?, 0)
    }

    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at().map(|at| at - Utc::now())
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.time_until_expiry().map(|d| d.num_minutes().max(0))
    }

    pub fn is_past_expiry(&self) -> bool {
        self.expires_at().map(|at| Utc::now() >= at).unwrap_or(false)
    }
}

impl Session {
    /// Claims of the stored token, if it is a readable JWT
    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().and_then(|t| TokenClaims::decode(&t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_claims() {
        let token = jwt(r#"{"user_id":3,"email":"a@b.c","exp":4102444800}"#);
        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.user_id, Some(3));
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
        assert_eq!(claims.expires_at().unwrap().to_rfc3339(), "2100-01-01T00:00:00+00:00");
        assert!(!claims.is_past_expiry());
        assert!(claims.minutes_until_expiry().unwrap() > 0);
    }

    #[test]
    fn test_past_expiry() {
        let claims = TokenClaims::decode(&jwt(r#"{"exp":1000}"#)).unwrap();
        assert!(claims.is_past_expiry());
        assert_eq!(claims.minutes_until_expiry(), Some(0));
    }

    #[test]
    fn test_decode_rejects_non_jwt() {
        assert_eq!(TokenClaims::decode("abc"), None);
        assert_eq!(TokenClaims::decode("a.b"), None);
        assert_eq!(TokenClaims::decode("a.!!!.c"), None);
        assert_eq!(TokenClaims::decode("a.b.c.d"), None);
    }

    #[test]
    fn test_session_claims_do_not_affect_authentication() {
        let session = Session::new(MemoryStore::new());
        session
            .set_auth(&jwt(r#"{"exp":1000}"#), &serde_json::json!({"id": 1}))
            .unwrap();
        assert!(session.claims().unwrap().is_past_expiry());
        assert!(session.is_authenticated());
    }
}
