//! Application glue module
//!
//! Configuration, command-line arguments and logging setup.

mod config;

pub use config::{CliArgs, Config, ConfigError};

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Send logs to `path`.
///
/// Stdout is the editor's screen, so logs never go to the terminal.
pub fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
