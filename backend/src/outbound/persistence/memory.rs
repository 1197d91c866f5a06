//! In-memory entity store.
//!
//! Backs the repository ports with `Mutex<HashMap>` maps. The lock makes
//! each operation atomic, so the store remains the sole arbiter of
//! consistency: two concurrent inserts with the same normalised email
//! resolve to exactly one success and one `DuplicateEmail` rejection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{
    ContactoPersistenceError, ContactoRepository, UsuarioPersistenceError, UsuarioRepository,
};
use crate::domain::{
    Contacto, Email, EntityId, IdentifierFormat, InvalidIdentifier, NuevoContacto, NuevoUsuario,
    Usuario,
};

/// UUID identifier syntax used by the in-memory backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentifierFormat;

impl IdentifierFormat for UuidIdentifierFormat {
    fn validate(&self, raw: &str) -> bool {
        Uuid::parse_str(raw).is_ok()
    }

    fn parse(&self, raw: &str) -> Result<EntityId, InvalidIdentifier> {
        if !self.validate(raw) {
            return Err(InvalidIdentifier);
        }
        EntityId::new(raw)
    }

    fn generate(&self) -> EntityId {
        // A freshly generated UUID string always satisfies EntityId's
        // non-empty/trimmed checks.
        EntityId::new(Uuid::new_v4().to_string()).unwrap_or_else(|_| {
            panic!("generated UUID must be a valid identifier")
        })
    }
}

/// In-memory Usuario store keyed by id, with email uniqueness enforced
/// inside the insert's critical section.
#[derive(Default)]
pub struct InMemoryUsuarioRepository {
    store: Mutex<HashMap<EntityId, Usuario>>,
    ids: UuidIdentifierFormat,
}

#[async_trait]
impl UsuarioRepository for InMemoryUsuarioRepository {
    async fn insert(&self, nuevo: NuevoUsuario) -> Result<Usuario, UsuarioPersistenceError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| UsuarioPersistenceError::connection("usuario store lock poisoned"))?;
        if guard.values().any(|u| u.email == nuevo.email) {
            return Err(UsuarioPersistenceError::duplicate_email(
                nuevo.email.as_str(),
            ));
        }
        let now = Utc::now();
        let usuario = Usuario {
            id: self.ids.generate(),
            nombre: nuevo.nombre,
            apellido: nuevo.apellido,
            email: nuevo.email,
            password: nuevo.password,
            created_at: now,
            updated_at: now,
        };
        guard.insert(usuario.id.clone(), usuario.clone());
        Ok(usuario)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Usuario>, UsuarioPersistenceError> {
        let guard = self
            .store
            .lock()
            .map_err(|_| UsuarioPersistenceError::connection("usuario store lock poisoned"))?;
        Ok(guard.values().find(|u| &u.email == email).cloned())
    }
}

/// In-memory Contacto store keyed by id.
#[derive(Default)]
pub struct InMemoryContactoRepository {
    store: Mutex<HashMap<EntityId, Contacto>>,
    ids: UuidIdentifierFormat,
}

#[async_trait]
impl ContactoRepository for InMemoryContactoRepository {
    async fn insert(&self, nuevo: NuevoContacto) -> Result<Contacto, ContactoPersistenceError> {
        let now = Utc::now();
        let contacto = Contacto::from_parts(
            self.ids.generate(),
            nuevo.usuario_id,
            nuevo.nombre,
            nuevo.telefonos,
            now,
            now,
        )
        .map_err(|err| ContactoPersistenceError::query(err.to_string()))?;

        let mut guard = self
            .store
            .lock()
            .map_err(|_| ContactoPersistenceError::connection("contacto store lock poisoned"))?;
        guard.insert(contacto.id.clone(), contacto.clone());
        Ok(contacto)
    }

    async fn find_by_id(
        &self,
        id: &EntityId,
    ) -> Result<Option<Contacto>, ContactoPersistenceError> {
        let guard = self
            .store
            .lock()
            .map_err(|_| ContactoPersistenceError::connection("contacto store lock poisoned"))?;
        Ok(guard.get(id).cloned())
    }

    async fn find_by_usuario(
        &self,
        usuario_id: &EntityId,
    ) -> Result<Vec<Contacto>, ContactoPersistenceError> {
        let guard = self
            .store
            .lock()
            .map_err(|_| ContactoPersistenceError::connection("contacto store lock poisoned"))?;
        let mut owned: Vec<Contacto> = guard
            .values()
            .filter(|c| &c.usuario_id == usuario_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(owned)
    }

    async fn update(
        &self,
        mut contacto: Contacto,
    ) -> Result<Option<Contacto>, ContactoPersistenceError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| ContactoPersistenceError::connection("contacto store lock poisoned"))?;
        if !guard.contains_key(&contacto.id) {
            return Ok(None);
        }
        contacto.updated_at = Utc::now();
        guard.insert(contacto.id.clone(), contacto.clone());
        Ok(Some(contacto))
    }

    async fn delete(&self, id: &EntityId) -> Result<bool, ContactoPersistenceError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| ContactoPersistenceError::connection("contacto store lock poisoned"))?;
        Ok(guard.remove(id).is_some())
    }
}
