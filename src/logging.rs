//! Tracing setup. Log lines go to a file because the terminal is in raw
//! mode while the typewriter runs.

use crate::config;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

/// Filter used when the log level env var is not set
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "typewriter=debug,warn"
    } else {
        "typewriter=info,warn"
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(config::LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber, appending to the configured log file
pub fn init_tracing_subscriber(verbose: bool) -> Result<()> {
    let log_path = config::get_log_file_path();
    let log_path = Path::new(&log_path);

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory '{}'", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose))
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))?;

    tracing::info!("Logging to '{}'", log_path.display());
    Ok(())
}
