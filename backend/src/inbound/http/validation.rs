//! Request DTOs and declarative field-rule sets, one per operation.
//!
//! Every rule in a set runs; failures accumulate so the client sees all
//! violations at once. Passing validation guarantees the conversion
//! helpers below succeed, but they still propagate errors rather than
//! panic. These rules only inspect the request; structural invariants that
//! depend on stored state (the phone cap on append) are re-checked by the
//! domain services at the point of mutation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{ApiError, FieldError};
use crate::domain::{
    Email, EntityId, IdentifierFormat, Telefono, TelefonoTipo, MAX_TELEFONOS, NUMERO_MIN,
};
use crate::middleware::sanitize::sanitize_str;

/// Body for `POST /api/usuarios/crearUsuario`. Fields are optional at the
/// serde layer so missing values surface as field errors, not a 400 from
/// the deserializer.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearUsuarioRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /api/usuarios/login`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Embedded phone entry as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelefonoDto {
    #[schema(example = "personal")]
    pub tipo: Option<String>,
    #[schema(example = "5551234")]
    pub numero: Option<String>,
}

/// Body for `POST /api/contactos`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearContactoRequest {
    pub usuario_id: Option<String>,
    pub nombre: Option<String>,
    pub telefonos: Option<Vec<TelefonoDto>>,
}

/// Body for `PUT /api/contactos/{contactoId}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarContactoRequest {
    pub nombre: Option<String>,
    pub telefonos: Option<Vec<TelefonoDto>>,
}

/// Body for `POST /api/contactos/{contactoId}/telefonos`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgregarTelefonoRequest {
    pub tipo: Option<String>,
    pub numero: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Rules for creating a Usuario.
#[must_use]
pub fn validar_crear_usuario(req: &CrearUsuarioRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&req.nombre) {
        errors.push(FieldError::new("nombre", "nombre es requerido"));
    }
    if is_blank(&req.apellido) {
        errors.push(FieldError::new("apellido", "apellido es requerido"));
    }
    if req
        .email
        .as_deref()
        .map_or(true, |raw| Email::new(raw).is_err())
    {
        errors.push(FieldError::new("email", "email inválido"));
    }
    if req
        .password
        .as_deref()
        .map_or(true, |p| p.chars().count() < 8)
    {
        errors.push(FieldError::new(
            "password",
            "password debe tener al menos 8 caracteres",
        ));
    }
    errors
}

/// Rules for logging a Usuario in.
#[must_use]
pub fn validar_login(req: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if req
        .email
        .as_deref()
        .map_or(true, |raw| Email::new(raw).is_err())
    {
        errors.push(FieldError::new("email", "email inválido"));
    }
    if is_blank(&req.password) {
        errors.push(FieldError::new("password", "password es requerido"));
    }
    errors
}

/// Shared rules for a phone list: capped at [`MAX_TELEFONOS`], each entry
/// with an enumerated `tipo` and a `numero` of at least [`NUMERO_MIN`]
/// characters.
#[must_use]
pub fn validar_telefonos(telefonos: &[TelefonoDto]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if telefonos.len() > MAX_TELEFONOS {
        errors.push(FieldError::new(
            "telefonos",
            "telefonos debe ser un arreglo con máximo 3 elementos",
        ));
    }
    for (index, telefono) in telefonos.iter().enumerate() {
        if telefono
            .tipo
            .as_deref()
            .map_or(true, |t| TelefonoTipo::parse(t).is_err())
        {
            errors.push(FieldError::new(
                format!("telefonos[{index}].tipo"),
                "tipo de telefono inválido",
            ));
        }
        if telefono
            .numero
            .as_deref()
            .map_or(true, |n| n.chars().count() < NUMERO_MIN)
        {
            errors.push(FieldError::new(
                format!("telefonos[{index}].numero"),
                format!("numero debe tener al menos {NUMERO_MIN} caracteres"),
            ));
        }
    }
    errors
}

/// Rules for creating a Contacto.
#[must_use]
pub fn validar_crear_contacto(req: &CrearContactoRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if is_blank(&req.usuario_id) {
        errors.push(FieldError::new("usuarioId", "usuarioId es requerido"));
    }
    if is_blank(&req.nombre) {
        errors.push(FieldError::new("nombre", "nombre es requerido"));
    }
    if let Some(telefonos) = &req.telefonos {
        errors.extend(validar_telefonos(telefonos));
    }
    errors
}

/// Rules for partially updating a Contacto.
#[must_use]
pub fn validar_actualizar_contacto(req: &ActualizarContactoRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(nombre) = &req.nombre {
        if nombre.trim().is_empty() {
            errors.push(FieldError::new("nombre", "nombre no debe estar vacío"));
        }
    }
    if let Some(telefonos) = &req.telefonos {
        errors.extend(validar_telefonos(telefonos));
    }
    errors
}

/// Rules for appending a single Telefono.
#[must_use]
pub fn validar_agregar_telefono(req: &AgregarTelefonoRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match req.tipo.as_deref() {
        None => errors.push(FieldError::new("tipo", "tipo es requerido")),
        Some(tipo) if TelefonoTipo::parse(tipo).is_err() => {
            errors.push(FieldError::new("tipo", "tipo de telefono inválido"));
        }
        Some(_) => {}
    }
    match req.numero.as_deref() {
        None => errors.push(FieldError::new("numero", "numero es requerido")),
        Some(numero) if numero.chars().count() < NUMERO_MIN => {
            errors.push(FieldError::new(
                "numero",
                format!("numero debe tener al menos {NUMERO_MIN} caracteres"),
            ));
        }
        Some(_) => {}
    }
    errors
}

/// Short-circuit a handler when a rule set reported failures.
pub fn ensure_valid(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

/// Parse a path or body identifier through the store's format, sanitizing
/// first. Malformed input yields a 400 before any store access.
pub fn parse_id(
    ids: &dyn IdentifierFormat,
    raw: &str,
    field: &str,
) -> Result<EntityId, ApiError> {
    let clean = sanitize_str(raw);
    ids.parse(&clean)
        .map_err(|_| ApiError::bad_request(format!("{field} inválido")))
}

/// Convert validated wire telefonos into domain values.
pub fn telefonos_from(dtos: &[TelefonoDto]) -> Result<Vec<Telefono>, ApiError> {
    dtos.iter()
        .map(|dto| {
            let tipo = dto
                .tipo
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("tipo de telefono inválido"))
                .and_then(|raw| {
                    TelefonoTipo::parse(raw)
                        .map_err(|err| ApiError::bad_request(err.to_string()))
                })?;
            let numero = dto
                .numero
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("numero es requerido"))?;
            Telefono::new(tipo, numero).map_err(|err| ApiError::bad_request(err.to_string()))
        })
        .collect()
}
