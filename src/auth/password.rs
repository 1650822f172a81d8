//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id using a fresh random salt per call and
//! stored as PHC strings (`$argon2id$...`).

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Error type for password hashing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),
}

/// Hash a password using Argon2id
///
/// The same password hashes to a different string on every call because the
/// salt is random, but every such hash verifies against the password.
///
/// # Errors
///
/// Returns an error if hashing fails (should not happen in normal operation)
///
/// # Example
///
/// ```
/// use storefront::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("pwd1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(verify_password("pwd1", &hash));
/// ```
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a password against a stored hash
///
/// Returns `false` for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_argon2id() {
        let hash = hash_password("pwd1").unwrap();

        assert!(
            hash.starts_with("$argon2id$"),
            "Hash should be in Argon2id format"
        );
    }

    #[test]
    fn test_hash_password_unique_salts() {
        let hash1 = hash_password("pwd1").unwrap();
        let hash2 = hash_password("pwd1").unwrap();

        assert_ne!(
            hash1, hash2,
            "Same password should produce different hashes due to different salts"
        );
        assert!(verify_password("pwd1", &hash1));
        assert!(verify_password("pwd1", &hash2));
    }

    #[test]
    fn test_verify_password_success() {
        for password in ["pwd1", "correct horse battery staple", "ünïcødé", " "] {
            let hash = hash_password(password).unwrap();
            assert!(
                verify_password(password, &hash),
                "Verification should succeed for {:?}",
                password
            );
        }
    }

    #[test]
    fn test_verify_password_wrong_password() {
        let hash = hash_password("pwd2").unwrap();

        assert!(!verify_password("pwd1", &hash));
        assert!(!verify_password("pwd2 ", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(!verify_password("pwd1", "not_a_valid_hash"));
        assert!(!verify_password("pwd1", ""));
    }
}
