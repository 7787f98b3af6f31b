//! Argon2id password hashing for stored user credentials.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so a hash stays verifiable if the defaults change.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use writeit_core::ports::{AuthError, PasswordService};

/// Argon2-based password service.
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::HashingError("password is empty".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// `Ok(false)` on a mismatch. A stored value that is not a PHC string
    /// is an error, not a mismatch.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            tracing::warn!("Stored password hash is malformed: {}", e);
            AuthError::HashingError(e.to_string())
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_phc_string() {
        let service = Argon2PasswordService::new();

        let first = service.hash("correct horse").unwrap();
        let second = service.hash("correct horse").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(service.verify("correct horse", &first).unwrap());
        assert!(service.verify("correct horse", &second).unwrap());
    }

    #[test]
    fn test_wrong_password_is_a_mismatch() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("correct horse").unwrap();

        assert!(!service.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_is_not_hashed() {
        let service = Argon2PasswordService::new();
        assert!(matches!(service.hash(""), Err(AuthError::HashingError(_))));
    }

    #[test]
    fn test_verify_against_plaintext_value() {
        let service = Argon2PasswordService::new();
        assert!(matches!(
            service.verify("secret", "secret"),
            Err(AuthError::HashingError(_))
        ));
    }
}
