//! Actix middleware: request sanitization and request logging.

pub mod log;
pub mod sanitize;

pub use log::RequestLog;
pub use sanitize::Sanitize;
