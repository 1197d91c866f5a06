//! Structured logging initialisation.
//!
//! Events go to the console and, when the target directory can be created,
//! to an append-only JSON file (`services.log`) through a non-blocking
//! writer. Failure to set up the file sink degrades to console-only with a
//! warning; logging problems never propagate to request handling.

use std::path::Path;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE: &str = "services.log";

/// Flush handle for the file sink. Keep it alive for the process lifetime;
/// dropping it flushes and shuts the background writer down.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise the global subscriber. Safe to call when a subscriber is
/// already installed (tests); the existing one wins.
pub fn init(log_dir: &Path) -> LoggingGuard {
    match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false).json();
            if tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer())
                .with(file_layer)
                .try_init()
                .is_err()
            {
                warn!("tracing subscriber already initialised; keeping existing sinks");
            }
            LoggingGuard {
                _file_guard: Some(guard),
            }
        }
        Err(error) => {
            let installed = tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt::layer())
                .try_init()
                .is_ok();
            if installed {
                warn!(
                    %error,
                    path = %log_dir.display(),
                    "could not create log directory; falling back to console-only logging"
                );
            }
            LoggingGuard { _file_guard: None }
        }
    }
}
