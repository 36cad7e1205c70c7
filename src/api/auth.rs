//! Principal resolution
//!
//! Turns an `Authorization: Bearer <jwt>` header into the calling user.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Claims this service reads from a token. Everything else is ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Standard subject claim, used by the auth service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Legacy claim carrying the user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header is required")]
    MissingHeader,

    #[error("invalid authorization header format")]
    MalformedHeader,

    #[error("invalid token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token must contain either 'sub' or 'user_id' claim with a valid UUID")]
    MissingSubject,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthenticated(err.to_string())
    }
}

/// Verifies HMAC-signed tokens against a shared secret.
#[derive(Clone)]
pub struct PrincipalResolver {
    key: DecodingKey,
    validation: Validation,
}

impl PrincipalResolver {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // `exp` is checked when present but tokens without it are accepted
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolve the raw `Authorization` header value.
    pub fn resolve_header(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(header)?;
        self.resolve_token(token)
    }

    pub fn resolve_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        let user_id = subject(&claims).ok_or(AuthError::MissingSubject)?;

        Ok(Principal {
            user_id,
            email: claims.email.filter(|e| !e.is_empty()),
        })
    }
}

fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.filter(|h| !h.is_empty()).ok_or(AuthError::MissingHeader)?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// `sub` wins when it holds a usable UUID, otherwise `user_id` is tried.
fn subject(claims: &Claims) -> Option<Uuid> {
    let parse = |raw: &Option<String>| {
        raw.as_deref()
            .and_then(|s| Uuid::parse_str(s).ok())
            .filter(|id| !id.is_nil())
    };

    parse(&claims.sub).or_else(|| parse(&claims.user_id))
}
