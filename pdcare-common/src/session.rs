//! User accounts and explicit login sessions
//!
//! The caller owns the session token returned by `login` and passes it back
//! on every request. There is no process-wide "current user".
//!
//! # Password storage
//!
//! Passwords are stored as salted SHA-256 digests. This is adequate for a
//! local screening tool and nothing more.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::future::Future;
use uuid::Uuid;

use crate::{Error, Result};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registered user (without credentials)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Logged-in session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: Uuid,
    pub user: UserAccount,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session management capability
///
/// One consolidated interface for account registration and the session
/// lifecycle. Implementations must be shareable across request handlers.
pub trait SessionManager: Send + Sync {
    /// Register a new account
    ///
    /// Fails with `InvalidInput` on missing fields, malformed email or short
    /// password, and with `AlreadyExists` when the email is taken.
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserAccount>> + Send;

    /// Check credentials and open a new session
    fn login(&self, email: &str, password: &str) -> impl Future<Output = Result<Session>> + Send;

    /// End a session (unknown tokens are ignored)
    fn logout(&self, token: Uuid) -> impl Future<Output = Result<()>> + Send;

    /// Resolve a token to its live session, `None` if unknown or expired
    fn current_session(&self, token: Uuid) -> impl Future<Output = Result<Option<Session>>> + Send;
}

/// Validated registration input
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Validate raw registration fields
    pub fn validate(username: &str, email: &str, password: &str) -> Result<Self> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput("All fields are required".to_string()));
        }
        if !is_valid_email(email) {
            return Err(Error::InvalidInput("Invalid email format".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Needs a dot with at least one character on each side
    let mut inner = domain.chars();
    inner.next();
    inner.next_back();
    inner.as_str().contains('.')
}

/// Generate a random 128-bit salt as 32 hex characters
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// SHA-256 of `salt || password` as 64 hex characters
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a password against a stored hash and salt
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(is_valid_email("x@y.z"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example."));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email("ada@ex@ample.com"));
        assert!(!is_valid_email("ada@é"));
    }

    #[test]
    fn test_registration_requires_all_fields() {
        let err = Registration::validate("  ", "ada@example.com", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: All fields are required");
    }

    #[test]
    fn test_registration_rejects_short_password() {
        let err = Registration::validate("ada", "ada@example.com", "12345").unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[test]
    fn test_registration_trims_username_and_email() {
        let reg = Registration::validate(" ada ", " ada@example.com ", "secret1").unwrap();
        assert_eq!(reg.username, "ada");
        assert_eq!(reg.email, "ada@example.com");
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 32);

        let hash = hash_password("secret1", &salt);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(verify_password("secret1", &salt, &hash));
        assert!(!verify_password("secret2", &salt, &hash));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_password("secret1", "aa"), hash_password("secret1", "bb"));
    }
}
