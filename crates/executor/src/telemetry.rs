//! Structured logging for the executor.
//!
//! The executor is a short-lived per-event invocation; the execution host
//! captures stdout/stderr, so logs are emitted as JSON lines rather than
//! exported to a collector. The decrypted plaintext must never appear in any
//! log field.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global tracing subscriber with JSON output.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_telemetry(log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .context("failed to initialise tracing subscriber")?;

    Ok(())
}
