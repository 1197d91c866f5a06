//! Contacto API handlers: CRUD plus the phone-append operation.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use super::validation::{
    ensure_valid, parse_id, telefonos_from, validar_actualizar_contacto, validar_agregar_telefono,
    validar_crear_contacto, ActualizarContactoRequest, AgregarTelefonoRequest,
    CrearContactoRequest,
};
use crate::domain::{ActualizacionContacto, Contacto, NuevoContacto, Telefono, TelefonoTipo};

/// Wire shape of an embedded phone entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelefonoResponse {
    pub tipo: TelefonoTipo,
    pub numero: String,
}

impl From<&Telefono> for TelefonoResponse {
    fn from(telefono: &Telefono) -> Self {
        Self {
            tipo: telefono.tipo(),
            numero: telefono.numero().to_owned(),
        }
    }
}

/// External representation of a Contacto.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactoResponse {
    pub id: String,
    pub usuario_id: String,
    pub nombre: String,
    pub telefonos: Vec<TelefonoResponse>,
}

impl From<&Contacto> for ContactoResponse {
    fn from(contacto: &Contacto) -> Self {
        Self {
            id: contacto.id.to_string(),
            usuario_id: contacto.usuario_id.to_string(),
            nombre: contacto.nombre.clone(),
            telefonos: contacto.telefonos().iter().map(TelefonoResponse::from).collect(),
        }
    }
}

/// Query parameters for the list operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarContactosQuery {
    pub usuario_id: Option<String>,
}

/// Create a Contacto for an existing Usuario.
#[utoipa::path(
    post,
    path = "/api/contactos",
    request_body = CrearContactoRequest,
    responses(
        (status = 201, description = "Contacto created", body = ContactoResponse),
        (status = 400, description = "Validation failure", body = super::error::ValidationErrorBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "crearContacto"
)]
#[post("")]
pub async fn crear_contacto(
    state: web::Data<HttpState>,
    payload: web::Json<CrearContactoRequest>,
) -> ApiResult<HttpResponse> {
    let req = payload.into_inner();
    ensure_valid(validar_crear_contacto(&req))?;

    let usuario_id = parse_id(
        state.ids.as_ref(),
        req.usuario_id.as_deref().unwrap_or_default(),
        "usuarioId",
    )?;
    let telefonos = telefonos_from(req.telefonos.as_deref().unwrap_or_default())?;
    let nuevo = NuevoContacto {
        usuario_id,
        nombre: req.nombre.map(|n| n.trim().to_owned()).unwrap_or_default(),
        telefonos,
    };
    let contacto = state.contactos.crear(nuevo).await?;
    Ok(HttpResponse::Created().json(ContactoResponse::from(&contacto)))
}

/// Append a phone entry to an existing Contacto.
///
/// Answers 400 without mutating when the stored list already holds three
/// entries.
#[utoipa::path(
    post,
    path = "/api/contactos/{contactoId}/telefonos",
    request_body = AgregarTelefonoRequest,
    params(("contactoId" = String, Path, description = "Contacto identifier")),
    responses(
        (status = 200, description = "Updated Contacto", body = ContactoResponse),
        (status = 400, description = "Validation failure or phone list full", body = super::error::MessageBody),
        (status = 404, description = "Contacto not found", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "agregarTelefono"
)]
#[post("/{contactoId}/telefonos")]
pub async fn agregar_telefono(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AgregarTelefonoRequest>,
) -> ApiResult<HttpResponse> {
    let contacto_id = parse_id(state.ids.as_ref(), &path.into_inner(), "contactoId")?;
    let req = payload.into_inner();
    ensure_valid(validar_agregar_telefono(&req))?;

    let tipo = req
        .tipo
        .as_deref()
        .map(TelefonoTipo::parse)
        .transpose()
        .map_err(|err| ApiError::bad_request(err.to_string()))?
        .ok_or_else(|| ApiError::bad_request("tipo es requerido"))?;
    let telefono = Telefono::new(tipo, req.numero.unwrap_or_default())
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let contacto = state
        .contactos
        .agregar_telefono(&contacto_id, telefono)
        .await?;
    Ok(HttpResponse::Ok().json(ContactoResponse::from(&contacto)))
}

/// Fetch a single Contacto by id.
#[utoipa::path(
    get,
    path = "/api/contactos/{contactoId}",
    params(("contactoId" = String, Path, description = "Contacto identifier")),
    responses(
        (status = 200, description = "Contacto", body = ContactoResponse),
        (status = 400, description = "Malformed identifier", body = super::error::MessageBody),
        (status = 404, description = "Contacto not found", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "obtenerContacto"
)]
#[get("/{contactoId}")]
pub async fn obtener_contacto(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let contacto_id = parse_id(state.ids.as_ref(), &path.into_inner(), "contactoId")?;
    let contacto = state.contactos.obtener(&contacto_id).await?;
    Ok(HttpResponse::Ok().json(ContactoResponse::from(&contacto)))
}

/// List every Contacto owned by the Usuario in the `usuarioId` query
/// parameter. An owner with no matches yields an empty array.
#[utoipa::path(
    get,
    path = "/api/contactos",
    params(("usuarioId" = String, Query, description = "Owning Usuario identifier")),
    responses(
        (status = 200, description = "Contactos owned by the Usuario", body = [ContactoResponse]),
        (status = 400, description = "Missing or malformed usuarioId", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "listarContactos"
)]
#[get("")]
pub async fn listar_contactos(
    state: web::Data<HttpState>,
    query: web::Query<ListarContactosQuery>,
) -> ApiResult<HttpResponse> {
    let raw = query
        .into_inner()
        .usuario_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("usuarioId query es requerido"))?;
    let usuario_id = parse_id(state.ids.as_ref(), &raw, "usuarioId")?;

    let contactos = state.contactos.listar(&usuario_id).await?;
    let body: Vec<ContactoResponse> = contactos.iter().map(ContactoResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Partially update a Contacto: `nombre` when provided, and `telefonos`
/// replaced wholesale when provided.
#[utoipa::path(
    put,
    path = "/api/contactos/{contactoId}",
    request_body = ActualizarContactoRequest,
    params(("contactoId" = String, Path, description = "Contacto identifier")),
    responses(
        (status = 200, description = "Updated Contacto", body = ContactoResponse),
        (status = 400, description = "Validation failure", body = super::error::ValidationErrorBody),
        (status = 404, description = "Contacto not found", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "actualizarContacto"
)]
#[put("/{contactoId}")]
pub async fn actualizar_contacto(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ActualizarContactoRequest>,
) -> ApiResult<HttpResponse> {
    let contacto_id = parse_id(state.ids.as_ref(), &path.into_inner(), "contactoId")?;
    let req = payload.into_inner();
    ensure_valid(validar_actualizar_contacto(&req))?;

    let cambios = ActualizacionContacto {
        nombre: req.nombre.map(|n| n.trim().to_owned()),
        telefonos: req
            .telefonos
            .as_deref()
            .map(telefonos_from)
            .transpose()?,
    };
    let contacto = state.contactos.actualizar(&contacto_id, cambios).await?;
    Ok(HttpResponse::Ok().json(ContactoResponse::from(&contacto)))
}

/// Delete a Contacto by id.
#[utoipa::path(
    delete,
    path = "/api/contactos/{contactoId}",
    params(("contactoId" = String, Path, description = "Contacto identifier")),
    responses(
        (status = 204, description = "Contacto deleted"),
        (status = 400, description = "Malformed identifier", body = super::error::MessageBody),
        (status = 404, description = "Contacto not found", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["contactos"],
    operation_id = "eliminarContacto"
)]
#[delete("/{contactoId}")]
pub async fn eliminar_contacto(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let contacto_id = parse_id(state.ids.as_ref(), &path.into_inner(), "contactoId")?;
    state.contactos.eliminar(&contacto_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
