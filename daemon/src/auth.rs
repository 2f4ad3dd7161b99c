//! Shared-secret API key authentication.
//!
//! A request is authorized when either presentation carries the configured key,
//! checked in this order:
//! - `X-API-Key: <key>`
//! - `Authorization: Bearer <key>`

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Header carrying the raw key
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credentials provided
    #[error("Authentication required")]
    MissingCredentials,
    /// Credentials provided but none matched
    #[error("Invalid API key")]
    InvalidCredentials,
}

#[derive(Clone)]
pub struct Authenticator {
    api_key: String,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let mut presented = false;

        if let Some(key) = header_str(headers, API_KEY_HEADER).filter(|k| !k.is_empty()) {
            presented = true;
            if self.validate_key(key) {
                return Ok(());
            }
        }

        if let Some(token) = header_str(headers, header::AUTHORIZATION.as_str()).and_then(bearer_token)
        {
            presented = true;
            if self.validate_key(token) {
                return Ok(());
            }
        }

        if presented {
            Err(AuthError::InvalidCredentials)
        } else {
            Err(AuthError::MissingCredentials)
        }
    }

    fn validate_key(&self, provided: &str) -> bool {
        !self.api_key.is_empty() && constant_time_compare(&self.api_key, provided)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Token from an `Authorization: Bearer <token>` value
fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

/// Extractor that rejects the request with 401 unless it carries the API key.
///
/// Put it first in a handler's argument list so the key is checked before
/// anything about the requested model is looked up.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match state.auth.authenticate(&parts.headers) {
            Ok(()) => Ok(RequireApiKey),
            Err(e) => {
                tracing::debug!(uri = %parts.uri, reason = %e, "Rejected unauthenticated request");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    const KEY: &str = "ml-model-key-2024";

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_api_key_header() {
        let auth = Authenticator::new(KEY);
        assert_eq!(auth.authenticate(&headers(&[("x-api-key", KEY)])), Ok(()));
    }

    #[test]
    fn test_api_key_header_is_case_insensitive_name() {
        let auth = Authenticator::new(KEY);
        assert_eq!(auth.authenticate(&headers(&[("X-API-Key", KEY)])), Ok(()));
    }

    #[test]
    fn test_bearer_token() {
        let auth = Authenticator::new(KEY);
        let value = format!("Bearer {}", KEY);
        assert_eq!(auth.authenticate(&headers(&[("authorization", &value)])), Ok(()));
    }

    #[test]
    fn test_missing_credentials() {
        let auth = Authenticator::new(KEY);
        assert_eq!(
            auth.authenticate(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.authenticate(&headers(&[("x-api-key", "")])),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_wrong_key() {
        let auth = Authenticator::new(KEY);
        assert_eq!(
            auth.authenticate(&headers(&[("x-api-key", "wrong")])),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.authenticate(&headers(&[("authorization", "Bearer wrong")])),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_either_channel_authorizes() {
        let auth = Authenticator::new(KEY);
        let bearer = format!("Bearer {}", KEY);
        assert_eq!(
            auth.authenticate(&headers(&[("x-api-key", "wrong"), ("authorization", &bearer)])),
            Ok(())
        );
        assert_eq!(
            auth.authenticate(&headers(&[("x-api-key", KEY), ("authorization", "Bearer wrong")])),
            Ok(())
        );
    }

    #[test]
    fn test_non_bearer_authorization_ignored() {
        let auth = Authenticator::new(KEY);
        let basic = format!("Basic {}", KEY);
        assert_eq!(
            auth.authenticate(&headers(&[("authorization", &basic)])),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.authenticate(&headers(&[("authorization", KEY)])),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_empty_configured_key_never_matches() {
        let auth = Authenticator::new("");
        assert_eq!(
            auth.authenticate(&headers(&[("authorization", "Bearer x")])),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let auth = Authenticator::new(KEY);
        assert!(!format!("{:?}", auth).contains(KEY));
    }
}
