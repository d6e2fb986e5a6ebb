//! JWT session middleware and feed token checks.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::web::error::ApiError;
use crate::{FeedlistError, Result};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username.
    pub username: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Keys and validation settings for session tokens.
#[derive(Clone)]
pub struct JwtState {
    /// Encoding key for issuing tokens.
    pub encoding_key: EncodingKey,
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a session token for a user, valid for `ttl_secs` seconds.
    pub fn issue(&self, user_id: i64, username: &str, ttl_secs: u64) -> Result<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| FeedlistError::Auth(e.to_string()))
    }

    /// Decode and validate a session token.
    pub fn verify(&self, token: &str) -> Option<JwtClaims> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                None
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

/// Optional session extractor.
///
/// Yields the claims of a valid bearer token, or `None` when the token is
/// missing, malformed or expired. Handlers decide how to answer anonymous
/// requests.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<JwtClaims>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let claims = match (bearer_token(parts), parts.extensions.get::<Arc<JwtState>>()) {
                (Some(token), Some(jwt_state)) => jwt_state.verify(token),
                _ => None,
            };
            Ok(OptionalAuthUser(claims))
        })
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}

/// Compare a presented feed token with the stored one in constant time.
///
/// An empty stored token disables token access.
pub fn feed_token_matches(stored: &str, presented: &str) -> bool {
    if stored.is_empty() {
        return false;
    }
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_token() {
        let state = JwtState::new("test-secret");
        let token = state.issue(7, "reader", 3600).unwrap();

        let claims = state.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "reader");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token() {
        let state = JwtState::new("test-secret");
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: 1,
            username: "reader".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &state.encoding_key).unwrap();

        assert!(state.verify(&token).is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let token = JwtState::new("secret-1").issue(1, "reader", 3600).unwrap();
        assert!(JwtState::new("secret-2").verify(&token).is_none());
    }

    #[test]
    fn test_feed_token_matches() {
        assert!(feed_token_matches("s3cret", "s3cret"));
        assert!(!feed_token_matches("s3cret", "s3cre"));
        assert!(!feed_token_matches("s3cret", "S3CRET"));
        assert!(!feed_token_matches("", ""));
    }
}
