//! Usuario API handlers: registration and login.

use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use super::validation::{
    ensure_valid, validar_crear_usuario, validar_login, CrearUsuarioRequest, LoginRequest,
};
use crate::domain::{Email, RegistroUsuario, Usuario};

/// External representation of a Usuario. The password digest never appears
/// here; the type simply has no field for it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioResponse {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

impl From<&Usuario> for UsuarioResponse {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id.to_string(),
            nombre: usuario.nombre.clone(),
            apellido: usuario.apellido.clone(),
            email: usuario.email.to_string(),
        }
    }
}

/// Register a new Usuario.
#[utoipa::path(
    post,
    path = "/api/usuarios/crearUsuario",
    request_body = CrearUsuarioRequest,
    responses(
        (status = 201, description = "Usuario created", body = UsuarioResponse),
        (status = 400, description = "Validation failure", body = super::error::ValidationErrorBody),
        (status = 409, description = "Email already registered", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["usuarios"],
    operation_id = "crearUsuario"
)]
#[post("/crearUsuario")]
pub async fn crear_usuario(
    state: web::Data<HttpState>,
    payload: web::Json<CrearUsuarioRequest>,
) -> ApiResult<HttpResponse> {
    let req = payload.into_inner();
    ensure_valid(validar_crear_usuario(&req))?;

    let email = Email::new(req.email.unwrap_or_default())
        .map_err(|_| ApiError::bad_request("email inválido"))?;
    let registro = RegistroUsuario {
        nombre: req.nombre.map(|n| n.trim().to_owned()).unwrap_or_default(),
        apellido: req.apellido.map(|a| a.trim().to_owned()).unwrap_or_default(),
        email,
        password: req.password.unwrap_or_default(),
    };
    let usuario = state.usuarios.registrar(registro).await?;
    Ok(HttpResponse::Created().json(UsuarioResponse::from(&usuario)))
}

/// Authenticate a Usuario and return its profile.
///
/// Unknown email and wrong password answer the same 401 so the endpoint
/// cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/api/usuarios/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UsuarioResponse),
        (status = 400, description = "Validation failure", body = super::error::ValidationErrorBody),
        (status = 401, description = "Invalid credentials", body = super::error::MessageBody),
        (status = 500, description = "Internal error", body = super::error::MessageBody)
    ),
    tags = ["usuarios"],
    operation_id = "loginUsuario"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let req = payload.into_inner();
    ensure_valid(validar_login(&req))?;

    let email = Email::new(req.email.unwrap_or_default())
        .map_err(|_| ApiError::bad_request("email inválido"))?;
    let usuario = state
        .usuarios
        .login(&email, req.password.as_deref().unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(UsuarioResponse::from(&usuario)))
}
