//! CRUD and phone-append orchestration for Contacto records.

use std::sync::Arc;

use tracing::error;

use super::ports::{ContactoPersistenceError, ContactoRepository};
use super::{Contacto, DomainError, EntityId, NuevoContacto, Telefono};

const CONTACTO_NO_ENCONTRADO: &str = "Contacto no encontrado";

/// Partial update: `nombre` replaces the current name only when present,
/// `telefonos` replaces the whole list only when present.
#[derive(Debug, Clone, Default)]
pub struct ActualizacionContacto {
    pub nombre: Option<String>,
    pub telefonos: Option<Vec<Telefono>>,
}

/// Use-case service for Contacto operations.
pub struct ContactoService {
    repo: Arc<dyn ContactoRepository>,
}

impl ContactoService {
    /// Wire the service to its store port.
    pub fn new(repo: Arc<dyn ContactoRepository>) -> Self {
        Self { repo }
    }

    /// Persist a new Contacto. The request validator already capped the
    /// phone list; the store assigns id and timestamps.
    pub async fn crear(&self, nuevo: NuevoContacto) -> Result<Contacto, DomainError> {
        self.repo
            .insert(nuevo)
            .await
            .map_err(|err| internal("crear_contacto", &err))
    }

    /// Fetch a single Contacto.
    pub async fn obtener(&self, id: &EntityId) -> Result<Contacto, DomainError> {
        self.find_existing(id, "obtener_contacto").await
    }

    /// List every Contacto owned by the given Usuario. An unknown owner is
    /// not an error; it simply matches nothing.
    pub async fn listar(&self, usuario_id: &EntityId) -> Result<Vec<Contacto>, DomainError> {
        self.repo
            .find_by_usuario(usuario_id)
            .await
            .map_err(|err| internal("listar_contactos", &err))
    }

    /// Append a phone entry. The cap is re-checked here against the stored
    /// list: the validator only sees the request, not current store state.
    pub async fn agregar_telefono(
        &self,
        id: &EntityId,
        telefono: Telefono,
    ) -> Result<Contacto, DomainError> {
        let mut contacto = self.find_existing(id, "agregar_telefono").await?;
        contacto
            .agregar_telefono(telefono)
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        self.write_back(contacto, "agregar_telefono").await
    }

    /// Apply a partial update and return the stored representation.
    pub async fn actualizar(
        &self,
        id: &EntityId,
        cambios: ActualizacionContacto,
    ) -> Result<Contacto, DomainError> {
        let mut contacto = self.find_existing(id, "actualizar_contacto").await?;
        if let Some(nombre) = cambios.nombre {
            contacto.nombre = nombre;
        }
        if let Some(telefonos) = cambios.telefonos {
            contacto
                .reemplazar_telefonos(telefonos)
                .map_err(|_| {
                    DomainError::invalid_request("Máximo 3 teléfonos permitidos")
                })?;
        }
        self.write_back(contacto, "actualizar_contacto").await
    }

    /// Delete a Contacto, verifying existence first.
    pub async fn eliminar(&self, id: &EntityId) -> Result<(), DomainError> {
        self.find_existing(id, "eliminar_contacto").await?;
        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|err| internal("eliminar_contacto", &err))?;
        if !removed {
            return Err(DomainError::not_found(CONTACTO_NO_ENCONTRADO));
        }
        Ok(())
    }

    async fn find_existing(
        &self,
        id: &EntityId,
        operation: &'static str,
    ) -> Result<Contacto, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|err| internal(operation, &err))?
            .ok_or_else(|| DomainError::not_found(CONTACTO_NO_ENCONTRADO))
    }

    async fn write_back(
        &self,
        contacto: Contacto,
        operation: &'static str,
    ) -> Result<Contacto, DomainError> {
        self.repo
            .update(contacto)
            .await
            .map_err(|err| internal(operation, &err))?
            .ok_or_else(|| DomainError::not_found(CONTACTO_NO_ENCONTRADO))
    }
}

fn internal(operation: &'static str, err: &ContactoPersistenceError) -> DomainError {
    error!(error = %err, operation, "unexpected store failure");
    DomainError::internal("Error interno")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, TelefonoTipo};
    use crate::outbound::persistence::InMemoryContactoRepository;

    fn service() -> ContactoService {
        ContactoService::new(Arc::new(InMemoryContactoRepository::default()))
    }

    fn usuario_id() -> EntityId {
        EntityId::new("11111111-1111-1111-1111-111111111111").expect("id")
    }

    fn telefono(numero: &str) -> Telefono {
        Telefono::new(TelefonoTipo::Personal, numero).expect("valid telefono")
    }

    fn nuevo(telefonos: Vec<Telefono>) -> NuevoContacto {
        NuevoContacto {
            usuario_id: usuario_id(),
            nombre: "Ana".into(),
            telefonos,
        }
    }

    #[tokio::test]
    async fn crear_assigns_identity() {
        let service = service();
        let contacto = service.crear(nuevo(vec![])).await.expect("created");
        assert!(!contacto.id.as_str().is_empty());
        assert!(contacto.telefonos().is_empty());
    }

    #[tokio::test]
    async fn agregar_telefono_rejects_full_list_without_mutating() {
        let service = service();
        let contacto = service
            .crear(nuevo(vec![telefono("111"), telefono("222"), telefono("333")]))
            .await
            .expect("created");

        let err = service
            .agregar_telefono(&contacto.id, telefono("444"))
            .await
            .expect_err("list is full");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "No se pueden agregar más de 3 teléfonos");

        let stored = service.obtener(&contacto.id).await.expect("still stored");
        assert_eq!(stored.telefonos().len(), 3);
    }

    #[tokio::test]
    async fn agregar_telefono_appends_and_persists() {
        let service = service();
        let contacto = service.crear(nuevo(vec![])).await.expect("created");
        let updated = service
            .agregar_telefono(&contacto.id, telefono("5551234"))
            .await
            .expect("appended");
        assert_eq!(updated.telefonos().len(), 1);
    }

    #[tokio::test]
    async fn actualizar_replaces_telefonos_wholesale() {
        let service = service();
        let contacto = service
            .crear(nuevo(vec![telefono("111"), telefono("222")]))
            .await
            .expect("created");

        let updated = service
            .actualizar(
                &contacto.id,
                ActualizacionContacto {
                    nombre: Some("Ana María".into()),
                    telefonos: Some(vec![telefono("999")]),
                },
            )
            .await
            .expect("updated");
        assert_eq!(updated.nombre, "Ana María");
        assert_eq!(updated.telefonos().len(), 1);
    }

    #[tokio::test]
    async fn actualizar_keeps_fields_not_provided() {
        let service = service();
        let contacto = service
            .crear(nuevo(vec![telefono("111")]))
            .await
            .expect("created");

        let updated = service
            .actualizar(&contacto.id, ActualizacionContacto::default())
            .await
            .expect("updated");
        assert_eq!(updated.nombre, "Ana");
        assert_eq!(updated.telefonos().len(), 1);
    }

    #[tokio::test]
    async fn eliminar_unknown_is_not_found() {
        let service = service();
        let missing = EntityId::new("22222222-2222-2222-2222-222222222222").expect("id");
        let err = service.eliminar(&missing).await.expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn listar_filters_by_owner() {
        let service = service();
        service.crear(nuevo(vec![])).await.expect("created");
        let other = EntityId::new("33333333-3333-3333-3333-333333333333").expect("id");

        let owned = service.listar(&usuario_id()).await.expect("list");
        assert_eq!(owned.len(), 1);
        let empty = service.listar(&other).await.expect("list");
        assert!(empty.is_empty());
    }
}
