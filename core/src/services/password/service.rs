//! Argon2id hashing plus the new-password acceptance rules

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use ambry_shared::utils::validation;

use crate::errors::{DomainError, DomainResult, ValidationError};

/// Hashes, verifies and vets passwords
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password into a PHC-format Argon2id digest
    pub fn hash(&self, password: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    /// Check a password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; a digest that cannot be parsed is a
    /// server error, since it means the stored value is corrupt.
    pub fn verify(&self, password: &str, digest: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| DomainError::internal(format!("stored password digest invalid: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Vet a candidate password: character policy, confirmation match,
    /// and distance from the account's public identifiers. Every
    /// violated rule is reported.
    pub fn vet_new_password(
        &self,
        password: &str,
        password_confirm: &str,
        identity_fields: &[&str],
    ) -> DomainResult<()> {
        let mut errors: Vec<DomainError> = Vec::new();

        if let Err(issues) = validation::validate_password(password) {
            errors.extend(
                issues
                    .into_iter()
                    .map(|i| DomainError::Validation(ValidationError::Password(i))),
            );
        }
        if password != password_confirm {
            errors.push(DomainError::Validation(
                ValidationError::PasswordConfirmMismatch,
            ));
        }
        if Self::too_similar(password, identity_fields) {
            errors.push(DomainError::Validation(ValidationError::PasswordTooSimilar));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::multiple(errors))
        }
    }

    /// Case-insensitive containment in either direction counts as
    /// too similar
    fn too_similar(password: &str, identity_fields: &[&str]) -> bool {
        let password = password.to_lowercase();
        identity_fields.iter().any(|field| {
            let field = field.to_lowercase();
            !field.is_empty() && (field.contains(&password) || password.contains(&field))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let svc = PasswordService::new();
        let digest = svc.hash("correct-horse-7").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(svc.verify("correct-horse-7", &digest).unwrap());
        assert!(!svc.verify("wrong-horse-7", &digest).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let svc = PasswordService::new();
        let a = svc.hash("correct-horse-7").unwrap();
        let b = svc.hash("correct-horse-7").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_digest_is_server_error() {
        let svc = PasswordService::new();
        let err = svc.verify("anything", "not-a-phc-string").unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.loggable());
    }

    #[test]
    fn test_vet_accepts_good_password() {
        let svc = PasswordService::new();
        assert!(svc
            .vet_new_password(
                "correct-horse-7",
                "correct-horse-7",
                &["some-user", "Some User", "user@example.com"],
            )
            .is_ok());
    }

    #[test]
    fn test_vet_reports_all_failures_together() {
        let svc = PasswordService::new();
        let err = svc
            .vet_new_password("abc", "abd", &["some-user"])
            .unwrap_err();
        let kinds: Vec<_> = err.details().into_iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&"PASSWORD_TOO_SHORT".to_string()));
        assert!(kinds.contains(&"PASSWORD_NEED_MORE_CHAR_TYPE".to_string()));
        assert!(kinds.contains(&"PASSWORD_CONFIRM_MISMATCH".to_string()));
    }

    #[test]
    fn test_vet_rejects_password_containing_username() {
        let svc = PasswordService::new();
        let err = svc
            .vet_new_password("Some-User99", "Some-User99", &["some-user"])
            .unwrap_err();
        assert_eq!(err.details()[0].kind, "PASSWORD_TOO_SIMILAR");
    }

    #[test]
    fn test_vet_rejects_password_contained_in_email() {
        let svc = PasswordService::new();
        let err = svc
            .vet_new_password("Example1", "Example1", &["user@example1.com"])
            .unwrap_err();
        assert_eq!(err.details()[0].kind, "PASSWORD_TOO_SIMILAR");
    }
}
