//! Backend entry point: parses configuration, initialises logging, and
//! runs the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use contactos_backend::server::{self, ServerConfig};

/// Command-line flags, each with an environment-variable fallback.
#[derive(Debug, Parser)]
#[command(name = "contactos-backend", about = "API de Contactos")]
struct Args {
    /// Socket address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind_addr: SocketAddr,

    /// Directory receiving the structured log file.
    #[arg(long, env = "LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// bcrypt work factor for password hashing.
    #[arg(long, env = "BCRYPT_SALT_ROUNDS", default_value_t = bcrypt::DEFAULT_COST)]
    bcrypt_cost: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let config = ServerConfig::new(args.bind_addr, args.log_dir, args.bcrypt_cost);

    // Keep the guard alive so the file sink flushes on shutdown.
    let _logging = server::logging::init(&config.log_dir);

    server::run(config).await
}
