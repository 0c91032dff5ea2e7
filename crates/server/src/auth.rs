//! Bearer token extraction for mutating routes.
//!
//! The admin UI obtains a GitHub access token through its own login flow and
//! sends it as `Authorization: Bearer <token>`. The token becomes the
//! identity that commits content changes; it is not validated here.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use navsphere_util::redact_sensitive;
use tracing::warn;

use crate::error::ApiError;

/// Access token of the user performing a change.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Err(ApiError::unauthorized());
        };
        let Ok(raw) = value.to_str() else {
            warn!("authorization header is not valid ASCII");
            return Err(ApiError::unauthorized());
        };
        match parse_bearer(raw) {
            Some(token) => Ok(Self(token.to_string())),
            None => {
                warn!(header = %redact_sensitive(&format!("authorization: {raw}")), "unsupported authorization scheme");
                Err(ApiError::unauthorized())
            }
        }
    }
}

fn parse_bearer(raw: &str) -> Option<&str> {
    let (scheme, token) = raw.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
