//! Argon2id password hashes in PHC string format.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{Error as PhcError, SaltString, rand_core::OsRng},
};

use minilinkedin_core::ports::{AuthError, PasswordService};

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
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

        // the parameters embedded in the stored hash win over our defaults
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_hash_checks_only_the_original_password() {
        let service = Argon2PasswordService::new();

        let stored = service.hash("secret123").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("secret123"));
        assert!(service.verify("secret123", &stored).unwrap());
        assert!(!service.verify("secret124", &stored).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_hashes() {
        let service = Argon2PasswordService::new();

        assert_ne!(service.hash("same").unwrap(), service.hash("same").unwrap());
    }

    #[test]
    fn test_unreadable_stored_hash_is_an_error() {
        let service = Argon2PasswordService::new();

        assert!(matches!(
            service.verify("whatever", "plaintext-in-the-db"),
            Err(AuthError::Hashing(_))
        ));
    }
}
