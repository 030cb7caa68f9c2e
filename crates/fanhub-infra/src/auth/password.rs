//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use fanhub_core::ports::{AuthError, PasswordService};

/// Argon2id with the library defaults and a fresh salt per hash.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::HashingError(
                "cannot hash an empty password".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        // A hash that fails to parse is a corrupt stored credential, not a
        // wrong password; surface it instead of reporting a mismatch.
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::HashingError(format!("stored hash is invalid: {e}")))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let service = Argon2PasswordService::new();
        let password = "secure_password_123";

        let hash = service.hash(password).unwrap();
        assert!(service.verify(password, &hash).unwrap());
        assert!(!service.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        let service = Argon2PasswordService::new();

        let first = service.hash("secure_password_123").unwrap();
        let second = service.hash("secure_password_123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn empty_password_is_rejected() {
        let service = Argon2PasswordService::new();
        assert!(matches!(
            service.hash(""),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn corrupt_stored_hash_is_an_error_not_a_mismatch() {
        let service = Argon2PasswordService::new();
        assert!(matches!(
            service.verify("anything", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
    }
}
