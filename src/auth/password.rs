// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with Argon2.
//!
//! Verification goes through `argon2`'s own comparison, which is
//! constant-time with respect to the candidate password.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::ApiError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// A mismatch is Unauthorized with the same message as an unknown email,
/// so login failures do not reveal which part was wrong.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| ApiError::internal(format!("stored password hash is invalid: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("pw12345678").unwrap();
        assert!(hash.starts_with("$argon2"));
        verify_password("pw12345678", &hash).unwrap();
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let hash = hash_password("pw12345678").unwrap();
        let err = verify_password("wrong-password", &hash).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("pw12345678").unwrap();
        let b = hash_password("pw12345678").unwrap();
        assert_ne!(a, b);
    }
}
