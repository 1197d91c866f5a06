//! Contacto aggregate: a named contact holding up to three phone numbers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// Hard cap on the number of telefonos a Contacto may hold. Enforced at
/// validation time and again at every mutation, so the invariant holds even
/// when the stored list is already at the limit.
pub const MAX_TELEFONOS: usize = 3;

/// Minimum length accepted for a phone number string.
pub const NUMERO_MIN: usize = 3;

/// Enumerated phone slot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TelefonoTipo {
    Personal,
    Oficina,
    Emergencia,
}

impl TelefonoTipo {
    /// Parse the wire representation used by requests.
    pub fn parse(raw: &str) -> Result<Self, TelefonoValidationError> {
        match raw {
            "personal" => Ok(Self::Personal),
            "oficina" => Ok(Self::Oficina),
            "emergencia" => Ok(Self::Emergencia),
            _ => Err(TelefonoValidationError::TipoInvalido),
        }
    }

    /// Wire representation of the variant.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Oficina => "oficina",
            Self::Emergencia => "emergencia",
        }
    }
}

impl fmt::Display for TelefonoTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for a single phone entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TelefonoValidationError {
    /// `tipo` is not one of the enumerated values.
    #[error("tipo de telefono inválido")]
    TipoInvalido,
    /// `numero` is shorter than [`NUMERO_MIN`].
    #[error("numero debe tener al menos {NUMERO_MIN} caracteres")]
    NumeroCorto,
}

/// Embedded phone entry. A value, not an entity: it has no identity of its
/// own and lives inside exactly one Contacto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telefono {
    tipo: TelefonoTipo,
    numero: String,
}

impl Telefono {
    /// Validate and construct a phone entry.
    pub fn new(
        tipo: TelefonoTipo,
        numero: impl Into<String>,
    ) -> Result<Self, TelefonoValidationError> {
        let numero = numero.into();
        if numero.chars().count() < NUMERO_MIN {
            return Err(TelefonoValidationError::NumeroCorto);
        }
        Ok(Self { tipo, numero })
    }

    /// Slot category.
    #[must_use]
    pub fn tipo(&self) -> TelefonoTipo {
        self.tipo
    }

    /// Phone number string.
    #[must_use]
    pub fn numero(&self) -> &str {
        self.numero.as_str()
    }
}

/// Raised when a mutation would push the phone list past [`MAX_TELEFONOS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No se pueden agregar más de {MAX_TELEFONOS} teléfonos")]
pub struct TelefonosLlenos;

/// Fields accepted when creating a Contacto. The id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NuevoContacto {
    pub usuario_id: EntityId,
    pub nombre: String,
    pub telefonos: Vec<Telefono>,
}

/// Persisted Contacto record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contacto {
    pub id: EntityId,
    pub usuario_id: EntityId,
    pub nombre: String,
    telefonos: Vec<Telefono>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contacto {
    /// Assemble a record from stored parts. Only the persistence adapter
    /// constructs these; the phone cap is re-checked so a corrupt row cannot
    /// smuggle an over-long list back into the domain.
    pub fn from_parts(
        id: EntityId,
        usuario_id: EntityId,
        nombre: String,
        telefonos: Vec<Telefono>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, TelefonosLlenos> {
        if telefonos.len() > MAX_TELEFONOS {
            return Err(TelefonosLlenos);
        }
        Ok(Self {
            id,
            usuario_id,
            nombre,
            telefonos,
            created_at,
            updated_at,
        })
    }

    /// Current phone entries, in insertion order.
    #[must_use]
    pub fn telefonos(&self) -> &[Telefono] {
        &self.telefonos
    }

    /// Append a phone entry, refusing once the list holds [`MAX_TELEFONOS`].
    pub fn agregar_telefono(&mut self, telefono: Telefono) -> Result<(), TelefonosLlenos> {
        if self.telefonos.len() >= MAX_TELEFONOS {
            return Err(TelefonosLlenos);
        }
        self.telefonos.push(telefono);
        Ok(())
    }

    /// Replace the phone list wholesale, subject to the same cap.
    pub fn reemplazar_telefonos(
        &mut self,
        telefonos: Vec<Telefono>,
    ) -> Result<(), TelefonosLlenos> {
        if telefonos.len() > MAX_TELEFONOS {
            return Err(TelefonosLlenos);
        }
        self.telefonos = telefonos;
        Ok(())
    }
}
