//! HTTP inbound adapter exposing the REST endpoints.

pub mod banner;
pub mod contactos;
pub mod error;
pub mod state;
pub mod usuarios;
pub mod validation;

pub use error::{ApiError, ApiResult, FieldError};
pub use state::HttpState;
