//! Credential hasher adapter backed by bcrypt.

use bcrypt::DEFAULT_COST;

use crate::domain::ports::{CredentialHashError, CredentialHasher};
use crate::domain::PasswordHash;

/// bcrypt-backed implementation of the [`CredentialHasher`] port.
///
/// # Examples
/// ```
/// use contactos_backend::domain::ports::CredentialHasher;
/// use contactos_backend::outbound::security::BcryptCredentialHasher;
///
/// // Low cost keeps the doctest fast; production uses the default.
/// let hasher = BcryptCredentialHasher::with_cost(4);
/// let digest = hasher.hash("Secret123").expect("hash");
/// assert!(hasher.verify("Secret123", &digest).expect("verify"));
/// assert!(!hasher.verify("incorrect", &digest).expect("verify"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentialHasher {
    cost: u32,
}

impl BcryptCredentialHasher {
    /// Hasher with a caller-supplied work factor.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialHasher for BcryptCredentialHasher {
    fn hash(&self, plain: &str) -> Result<PasswordHash, CredentialHashError> {
        bcrypt::hash(plain, self.cost)
            .map(PasswordHash::from_digest)
            .map_err(|err| CredentialHashError::new(err.to_string()))
    }

    fn verify(&self, plain: &str, digest: &PasswordHash) -> Result<bool, CredentialHashError> {
        bcrypt::verify(plain, digest.as_str())
            .map_err(|err| CredentialHashError::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_are_salted() {
        let hasher = BcryptCredentialHasher::with_cost(4);
        let a = hasher.hash("Secret123").expect("hash");
        let b = hasher.hash("Secret123").expect("hash");
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn verify_rejects_garbage_digest() {
        let hasher = BcryptCredentialHasher::with_cost(4);
        let digest = PasswordHash::from_digest("not-a-bcrypt-digest".into());
        assert!(hasher.verify("Secret123", &digest).is_err());
    }
}
