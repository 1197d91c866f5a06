//! Domain model, ports, and use-case services.
//!
//! Everything here is transport and storage agnostic. Inbound adapters map
//! requests into these types; outbound adapters implement the ports.

pub mod contacto;
pub mod contacto_service;
pub mod error;
pub mod id;
pub mod ports;
pub mod usuario;
pub mod usuario_service;

pub use contacto::{
    Contacto, NuevoContacto, Telefono, TelefonoTipo, TelefonoValidationError, TelefonosLlenos,
    MAX_TELEFONOS, NUMERO_MIN,
};
pub use contacto_service::{ActualizacionContacto, ContactoService};
pub use error::{DomainError, ErrorCode};
pub use id::{EntityId, IdentifierFormat, InvalidIdentifier};
pub use usuario::{Email, EmailValidationError, NuevoUsuario, PasswordHash, Usuario};
pub use usuario_service::{RegistroUsuario, UsuarioService};
