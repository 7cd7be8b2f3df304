//! Bearer-token authentication.
//!
//! The `Authorization: Bearer <jwt>` header identifies the calling
//! user for the audit trail only; the token is never forwarded to
//! GitHub. HS256 with a shared secret.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT claims we care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id) — becomes `created_by` on the audit row.
    pub sub: String,
    /// Expiration time (seconds since epoch).
    pub exp: usize,
}

/// Verifies bearer tokens and extracts the calling user's id.
pub struct AuthVerifier {
    decoding_key: DecodingKey,
}

impl AuthVerifier {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        }
    }

    /// Resolves the calling user from request headers.
    ///
    /// A missing header or an unverifiable token is a request
    /// validation error; no GitHub call happens after either.
    pub fn user_from_headers(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::MissingAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::InvalidToken("expected Bearer scheme".to_string()))?;

        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        Ok(data.claims.sub)
    }
}
