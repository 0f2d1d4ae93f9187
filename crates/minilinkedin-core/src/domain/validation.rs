//! Field-level input rules. Every check runs before storage is touched.

use crate::error::{DomainError, FieldError};

use super::ProfileChanges;

pub const POST_CONTENT_MAX: usize = 2000;
pub const NAME_MIN: usize = 2;
pub const BIO_MAX: usize = 500;
pub const PASSWORD_MIN: usize = 6;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Trim post content and check it holds between 1 and 2000 characters.
pub fn post_content(raw: &str) -> Result<String, DomainError> {
    let content = raw.trim();
    let len = char_len(content);
    if len == 0 || len > POST_CONTENT_MAX {
        return Err(DomainError::invalid(
            "content",
            format!("Post content must be between 1 and {POST_CONTENT_MAX} characters"),
        ));
    }
    Ok(content.to_string())
}

fn name(raw: &str) -> Result<String, FieldError> {
    let name = raw.trim();
    if char_len(name) < NAME_MIN {
        return Err(FieldError::new(
            "name",
            format!("Name must be at least {NAME_MIN} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Trimmed bio; empty becomes `None`.
fn bio(raw: &str) -> Result<Option<String>, FieldError> {
    let bio = raw.trim();
    if char_len(bio) > BIO_MAX {
        return Err(FieldError::new(
            "bio",
            format!("Bio must not exceed {BIO_MAX} characters"),
        ));
    }
    Ok((!bio.is_empty()).then(|| bio.to_string()))
}

/// Validate a partial profile update. Errors for both fields are reported together.
pub fn profile_changes(
    raw_name: Option<&str>,
    raw_bio: Option<&str>,
) -> Result<ProfileChanges, DomainError> {
    let mut errors = Vec::new();
    let mut changes = ProfileChanges::default();

    if let Some(raw) = raw_name {
        match name(raw) {
            Ok(v) => changes.name = Some(v),
            Err(e) => errors.push(e),
        }
    }
    if let Some(raw) = raw_bio {
        match bio(raw) {
            Ok(v) => changes.bio = Some(v),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(DomainError::Validation(errors))
    }
}

/// Registration input after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
}

/// Validate registration fields; the email is trimmed and lower-cased.
pub fn registration(raw_name: &str, raw_email: &str, password: &str) -> Result<Registration, DomainError> {
    let mut errors = Vec::new();

    let name = name(raw_name).map_err(|e| errors.push(e)).ok();
    let email = email(raw_email).map_err(|e| errors.push(e)).ok();
    if char_len(password) < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        ));
    }

    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(Registration { name, email }),
        _ => Err(DomainError::Validation(errors)),
    }
}

/// Normalize an email used as a login identifier.
pub fn email(raw: &str) -> Result<String, FieldError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(FieldError::new("email", "Please provide a valid email"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_content_is_trimmed() {
        assert_eq!(post_content("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_post_content_bounds() {
        assert!(post_content("").is_err());
        assert!(post_content(" \n\t ").is_err());
        assert!(post_content(&"a".repeat(2000)).is_ok());
        assert!(post_content(&"a".repeat(2001)).is_err());
        // surrounding whitespace does not count towards the limit
        assert!(post_content(&format!("  {}  ", "a".repeat(2000))).is_ok());
    }

    #[test]
    fn test_post_content_counts_characters_not_bytes() {
        assert!(post_content(&"é".repeat(2000)).is_ok());
    }

    #[test]
    fn test_profile_changes_normalize_bio() {
        let changes = profile_changes(None, Some("   ")).unwrap();
        assert_eq!(changes.bio, Some(None));
        assert_eq!(changes.name, None);

        let changes = profile_changes(Some("  Grace "), Some(" Admiral ")).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Grace"));
        assert_eq!(changes.bio, Some(Some("Admiral".to_string())));
    }

    #[test]
    fn test_profile_changes_empty_request() {
        assert!(profile_changes(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_profile_changes_collects_errors() {
        let err = profile_changes(Some(" a "), Some(&"b".repeat(501))).unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(email(" Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(email("ada").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("ada@example").is_err());
        assert!(email("ada@@example.com").is_err());
        assert!(email("a da@example.com").is_err());
    }

    #[test]
    fn test_registration() {
        let reg = registration(" Ada ", "ADA@example.com", "secret1").unwrap();
        assert_eq!(reg.name, "Ada");
        assert_eq!(reg.email, "ada@example.com");

        match registration("A", "nope", "123").unwrap_err() {
            DomainError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email", "password"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
