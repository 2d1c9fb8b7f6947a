//! Tracing setup: a formatted stdout layer filtered by `RUST_LOG`, or by the
//! configured level when the variable is unset.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), default_level)?;
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INITIALIZED.set(());

    tracing::info!("Logging initialized");
    Ok(())
}

fn build_filter(env: Option<String>, default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string());
    EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter { directive, source })
}
