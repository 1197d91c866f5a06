//! Usuario aggregate: an account with hashed-password credentials.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use super::EntityId;

/// Validation errors raised when constructing [`Email`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailValidationError {
    /// Empty after trimming.
    #[error("email es requerido")]
    Empty,
    /// Not a plausible address.
    #[error("email inválido")]
    Malformed,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Coarse shape check; the store never interprets the address.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Case-normalised, format-validated email address.
///
/// Normalisation is trim + ASCII lowercase; duplicate checks at the store
/// compare this normalised form only.
///
/// # Examples
/// ```
/// use contactos_backend::domain::Email;
///
/// let email = Email::new("  Juan@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "juan@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Normalise and validate an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(&normalised) {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way password digest. Opaque to the domain; only the credential
/// hasher adapter can produce or verify one. Deliberately implements
/// neither `Display` nor `Serialize` so it cannot leak into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest produced by the hasher adapter.
    #[must_use]
    pub fn from_digest(digest: String) -> Self {
        Self(digest)
    }

    /// Borrow the digest for verification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields accepted when registering a Usuario. The id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub apellido: String,
    pub email: Email,
    pub password: PasswordHash,
}

/// Persisted Usuario record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usuario {
    pub id: EntityId,
    pub nombre: String,
    pub apellido: String,
    pub email: Email,
    pub password: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("juan@example.com", "juan@example.com")]
    #[case("  Ana.Perez@Mail.EXAMPLE.org ", "ana.perez@mail.example.org")]
    fn email_normalises(#[case] raw: &str, #[case] expected: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("not-an-email", EmailValidationError::Malformed)]
    #[case("a@b", EmailValidationError::Malformed)]
    #[case("a b@example.com", EmailValidationError::Malformed)]
    fn email_rejects_malformed(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn normalised_emails_compare_equal() {
        let a = Email::new("JUAN@EXAMPLE.COM").expect("valid");
        let b = Email::new("juan@example.com").expect("valid");
        assert_eq!(a, b);
    }
}
