//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Settings gathered at startup from flags and environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// Directory receiving the structured log file.
    pub log_dir: PathBuf,
    /// Work factor for the bcrypt credential hasher.
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, log_dir: PathBuf, bcrypt_cost: u32) -> Self {
        Self {
            bind_addr,
            log_dir,
            bcrypt_cost,
        }
    }
}
