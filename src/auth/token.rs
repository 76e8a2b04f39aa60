// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token service: signed stateless access tokens and opaque refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying subject, role, issued-at, and
//! expiry; nothing is persisted here. Refresh tokens are 32 random bytes,
//! base64url-encoded; generation is pure, the caller persists the row.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;

use super::claims::AccessClaims;
use super::error::AuthError;
use super::roles::Role;

/// Default access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Default refresh token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Issues and validates session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service with the given HMAC secret and default TTLs.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttls(secret, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS)
    }

    /// Create a token service with explicit TTLs in seconds.
    pub fn with_ttls(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Access token lifetime in seconds (for the token pair response).
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Issue a signed access token for a user.
    pub fn issue_access_token(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::MalformedToken)
    }

    /// Generate an opaque refresh token (no persistence here).
    pub fn issue_refresh_token(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Base64UrlUnpadded::encode_string(&bytes)
    }

    /// Expiry timestamp for a refresh token issued now.
    pub fn refresh_expiry(&self) -> DateTime<Utc> {
        Utc::now() + self.refresh_ttl
    }

    /// Validate an access token, returning its claims.
    ///
    /// Failures are typed (malformed / expired / bad signature) so the
    /// authentication extractor can respond precisely without catching
    /// exceptions for control flow.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret-at-least-32-bytes-long!")
    }

    #[test]
    fn issue_and_validate_access_token() {
        let svc = service();
        let token = svc.issue_access_token("user-1", Role::Institutional).unwrap();

        let claims = svc.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "institutional");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_fails_with_bad_signature() {
        let svc = service();
        let other = TokenService::new(b"a-completely-different-secret-value");
        let token = svc.issue_access_token("user-1", Role::Admin).unwrap();

        let err = other.validate_access_token(&token).unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn expired_token_fails_with_token_expired() {
        // Negative TTL backdates the expiry beyond the leeway window
        let svc = TokenService::with_ttls(
            b"test-secret-at-least-32-bytes-long!",
            -(CLOCK_SKEW_LEEWAY as i64) - 60,
            DEFAULT_REFRESH_TTL_SECS,
        );
        let token = svc.issue_access_token("user-1", Role::Institutional).unwrap();

        let err = svc.validate_access_token(&token).unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[test]
    fn garbage_token_is_malformed() {
        let err = service().validate_access_token("not-a-jwt").unwrap_err();
        assert_eq!(err, AuthError::MalformedToken);
    }

    #[test]
    fn refresh_tokens_are_unique_and_opaque() {
        let svc = service();
        let a = svc.issue_refresh_token();
        let b = svc.issue_refresh_token();

        assert_ne!(a, b);
        // 32 bytes base64url-unpadded = 43 characters, no structure
        assert_eq!(a.len(), 43);
        assert!(!a.contains('.'));
    }

    #[test]
    fn refresh_expiry_is_in_the_future() {
        let svc = service();
        assert!(svc.refresh_expiry() > Utc::now());
    }
}
