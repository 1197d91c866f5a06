//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on the use-case services and the store's identifier format and stay
//! testable without real I/O.

use std::sync::Arc;

use crate::domain::{ContactoService, IdentifierFormat, UsuarioService};
use crate::outbound::persistence::{
    InMemoryContactoRepository, InMemoryUsuarioRepository, UuidIdentifierFormat,
};
use crate::outbound::security::BcryptCredentialHasher;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub usuarios: Arc<UsuarioService>,
    pub contactos: Arc<ContactoService>,
    pub ids: Arc<dyn IdentifierFormat>,
}

impl HttpState {
    /// Assemble state from explicit services and identifier format.
    #[must_use]
    pub fn new(
        usuarios: Arc<UsuarioService>,
        contactos: Arc<ContactoService>,
        ids: Arc<dyn IdentifierFormat>,
    ) -> Self {
        Self {
            usuarios,
            contactos,
            ids,
        }
    }

    /// State backed by the in-memory store and a bcrypt hasher with the
    /// given cost. Used by the server bootstrap and integration tests
    /// (tests pass a low cost to stay fast).
    #[must_use]
    pub fn in_memory(bcrypt_cost: u32) -> Self {
        let usuarios_repo = Arc::new(InMemoryUsuarioRepository::default());
        let contactos_repo = Arc::new(InMemoryContactoRepository::default());
        let hasher = Arc::new(BcryptCredentialHasher::with_cost(bcrypt_cost));
        Self {
            usuarios: Arc::new(UsuarioService::new(usuarios_repo, hasher)),
            contactos: Arc::new(ContactoService::new(contactos_repo)),
            ids: Arc::new(UuidIdentifierFormat),
        }
    }
}
