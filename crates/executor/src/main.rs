//! `decrypt-secret-executor` — runtime binary entry point.
//!
//! Invoked once per lifecycle event by the deployment engine's dispatcher.
//! Sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Read one [`InvocationPayload`] JSON document from stdin.
//! 4. Initialise AWS SDK clients (KMS pinned to the key's region).
//! 5. Decrypt the ciphertext and write the plaintext to the secret store.
//!
//! Any failure exits non-zero with the underlying error surfaced to the
//! dispatcher; retry policy belongs to the deployment engine, not here.

mod aws;
mod config;
mod handler;
mod telemetry;

use std::io::Read;

use anyhow::{Context, Result};
use common::InvocationPayload;
use tracing::info;

use config::Config;
use handler::SecretSetHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        kms_key_region = %cfg.kms_key_region,
        "decrypt-secret-executor starting"
    );

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read invocation payload from stdin")?;
    let payload: InvocationPayload =
        serde_json::from_str(&raw).context("invocation payload is not valid JSON")?;

    let aws = aws::AwsClients::init(&cfg.kms_key_region).await?;
    let handler = SecretSetHandler::new(aws.kms, aws.secretsmanager);
    handler.handle(&payload).await?;

    Ok(())
}
