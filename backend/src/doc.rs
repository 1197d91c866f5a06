//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every HTTP endpoint and the wire schemas into one
//! specification for external tooling.

use utoipa::OpenApi;

use crate::domain::TelefonoTipo;
use crate::inbound::http::contactos::{ContactoResponse, TelefonoResponse};
use crate::inbound::http::error::{FieldError, MessageBody, ValidationErrorBody};
use crate::inbound::http::usuarios::UsuarioResponse;
use crate::inbound::http::validation::{
    ActualizarContactoRequest, AgregarTelefonoRequest, CrearContactoRequest, CrearUsuarioRequest,
    LoginRequest, TelefonoDto,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "API de Contactos",
        description = "REST backend managing contactos owned by usuarios."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::banner::banner,
        crate::inbound::http::usuarios::crear_usuario,
        crate::inbound::http::usuarios::login,
        crate::inbound::http::contactos::crear_contacto,
        crate::inbound::http::contactos::agregar_telefono,
        crate::inbound::http::contactos::obtener_contacto,
        crate::inbound::http::contactos::listar_contactos,
        crate::inbound::http::contactos::actualizar_contacto,
        crate::inbound::http::contactos::eliminar_contacto,
    ),
    components(schemas(
        CrearUsuarioRequest,
        LoginRequest,
        UsuarioResponse,
        CrearContactoRequest,
        ActualizarContactoRequest,
        AgregarTelefonoRequest,
        TelefonoDto,
        TelefonoTipo,
        ContactoResponse,
        TelefonoResponse,
        FieldError,
        ValidationErrorBody,
        MessageBody,
    )),
    tags(
        (name = "usuarios", description = "Account registration and login"),
        (name = "contactos", description = "Contact management"),
        (name = "meta", description = "Service metadata")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_operation() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/",
            "/api/usuarios/crearUsuario",
            "/api/usuarios/login",
            "/api/contactos",
            "/api/contactos/{contactoId}",
            "/api/contactos/{contactoId}/telefonos",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
