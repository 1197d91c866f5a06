//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the entity store and the credential hasher). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of bubbling up backend-specific types.

use async_trait::async_trait;
use thiserror::Error;

use super::{Contacto, Email, EntityId, NuevoContacto, NuevoUsuario, PasswordHash, Usuario};

/// Persistence errors raised by [`UsuarioRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsuarioPersistenceError {
    /// The store rejected an insert because the normalised email is taken.
    /// Uniqueness lives in the store, which arbitrates concurrent inserts.
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },
    /// Store connectivity failures.
    #[error("usuario store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("usuario store query failed: {message}")]
    Query { message: String },
}

impl UsuarioPersistenceError {
    /// Helper for duplicate-email rejections.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence errors raised by [`ContactoRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactoPersistenceError {
    /// Store connectivity failures.
    #[error("contacto store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("contacto store query failed: {message}")]
    Query { message: String },
}

impl ContactoPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Failures raised by the credential hasher adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct CredentialHashError {
    message: String,
}

impl CredentialHashError {
    /// Wrap an adapter-specific failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence port for Usuario records.
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    /// Persist a new Usuario, assigning its id and timestamps. Fails with
    /// [`UsuarioPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, nuevo: NuevoUsuario) -> Result<Usuario, UsuarioPersistenceError>;

    /// Look a Usuario up by normalised email.
    async fn find_by_email(&self, email: &Email)
        -> Result<Option<Usuario>, UsuarioPersistenceError>;
}

/// Persistence port for Contacto records.
#[async_trait]
pub trait ContactoRepository: Send + Sync {
    /// Persist a new Contacto, assigning its id and timestamps.
    async fn insert(&self, nuevo: NuevoContacto) -> Result<Contacto, ContactoPersistenceError>;

    /// Fetch a Contacto by id.
    async fn find_by_id(&self, id: &EntityId)
        -> Result<Option<Contacto>, ContactoPersistenceError>;

    /// List every Contacto owned by the given Usuario.
    async fn find_by_usuario(
        &self,
        usuario_id: &EntityId,
    ) -> Result<Vec<Contacto>, ContactoPersistenceError>;

    /// Write back a mutated Contacto, refreshing its `updated_at`. Returns
    /// the stored representation, or `None` when the record vanished.
    async fn update(&self, contacto: Contacto)
        -> Result<Option<Contacto>, ContactoPersistenceError>;

    /// Delete a Contacto by id. Returns whether a record was removed.
    async fn delete(&self, id: &EntityId) -> Result<bool, ContactoPersistenceError>;
}

/// Opaque hash/verify capability for Usuario credentials. Synchronous by
/// contract; callers wanting to keep the executor responsive can move the
/// call onto a blocking thread.
pub trait CredentialHasher: Send + Sync {
    /// Derive a one-way digest from a plaintext password.
    fn hash(&self, plain: &str) -> Result<PasswordHash, CredentialHashError>;

    /// Check a plaintext password against a stored digest.
    fn verify(&self, plain: &str, digest: &PasswordHash) -> Result<bool, CredentialHashError>;
}
