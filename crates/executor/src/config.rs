//! Configuration loading and validation for the executor.
//!
//! All values are read from environment variables injected by the
//! orchestrator at declaration time. The process exits with a clear error
//! message if a required variable is missing.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated executor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Home region of the KMS key the ciphertext was encrypted with,
    /// extracted from the key ARN at orchestration time. **Required.**
    /// The secret-store client uses the ambient default region instead.
    pub kms_key_region: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `KMS_KEY_REGION` is absent or blank.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.kms_key_region.trim().is_empty() {
            anyhow::bail!("KMS_KEY_REGION is required and must not be empty");
        }
        Ok(())
    }
}
