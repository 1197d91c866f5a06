//! Opaque entity identifiers and the pluggable identifier format port.
//!
//! The domain treats identifiers as opaque strings; only the storage
//! backend knows their concrete shape. Inbound adapters parse raw path and
//! query parameters through an [`IdentifierFormat`] before any store
//! access, so a malformed identifier is rejected up front.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-generated opaque identifier for Usuario and Contacto entities.
///
/// # Examples
/// ```
/// use contactos_backend::domain::EntityId;
///
/// let id = EntityId::new("6569b9c0a1b2c3d4e5f60718").expect("valid id");
/// assert_eq!(id.as_str(), "6569b9c0a1b2c3d4e5f60718");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Construct an identifier after checking it is non-empty and trimmed.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let raw = raw.into();
        if raw.trim().is_empty() || raw.trim() != raw {
            return Err(InvalidIdentifier);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Raised when raw input is not a syntactically valid store identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identifier is not valid for the configured store")]
pub struct InvalidIdentifier;

/// Capability supplied by the storage backend describing its identifier
/// syntax. Keeps handler logic store-agnostic: the same code rejects a
/// malformed id with 400 whether the backend uses UUIDs or anything else.
pub trait IdentifierFormat: Send + Sync {
    /// Check whether the raw string is a well-formed identifier.
    fn validate(&self, raw: &str) -> bool;

    /// Parse a raw string into an [`EntityId`].
    fn parse(&self, raw: &str) -> Result<EntityId, InvalidIdentifier>;

    /// Generate a fresh identifier for a new entity.
    fn generate(&self) -> EntityId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(" padded ")]
    fn rejects_blank_or_padded(#[case] raw: &str) {
        assert!(EntityId::new(raw).is_err());
    }

    #[rstest]
    fn round_trips_through_string() {
        let id = EntityId::new("abc-123").expect("valid id");
        let raw: String = id.clone().into();
        assert_eq!(EntityId::try_from(raw), Ok(id));
    }
}
