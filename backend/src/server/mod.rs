//! Server assembly: route wiring and the HTTP entry point.

pub mod config;
pub mod logging;

use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::inbound::http::banner::banner;
use crate::inbound::http::contactos::{
    actualizar_contacto, agregar_telefono, crear_contacto, eliminar_contacto, listar_contactos,
    obtener_contacto,
};
use crate::inbound::http::usuarios::{crear_usuario, login};
use crate::inbound::http::{ApiError, HttpState};
use crate::middleware::{RequestLog, Sanitize};

pub use config::ServerConfig;

/// JSON extractor configuration: a body the extractor rejects still gets
/// the `{message}` envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|_err, _req| ApiError::bad_request("JSON inválido").into())
}

/// Register every route and the shared state on an Actix service config.
///
/// Used by both the production server and the integration tests, so the
/// two always exercise the same wiring.
pub fn configure(state: HttpState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(json_config())
            .service(banner)
            .service(
                web::scope("/api/usuarios")
                    .service(crear_usuario)
                    .service(login),
            )
            .service(
                web::scope("/api/contactos")
                    .service(crear_contacto)
                    .service(agregar_telefono)
                    .service(listar_contactos)
                    .service(obtener_contacto)
                    .service(actualizar_contacto)
                    .service(eliminar_contacto),
            );
    }
}

/// Bind and run the HTTP server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = HttpState::in_memory(config.bcrypt_cost);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Sanitize)
            .wrap(RequestLog)
            .configure(configure(state.clone()))
    })
    .bind(config.bind_addr)?;
    info!(addr = %config.bind_addr, "Servidor Online");
    server.run().await
}
