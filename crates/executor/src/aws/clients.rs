//! AWS SDK clients wired into the handler's collaborator traits.

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};

use crate::handler::{KmsDecrypt, SecretValueWriter};

/// Bundle of AWS SDK clients used by one invocation.
///
/// Both clients share the same underlying [`aws_config::SdkConfig`] so that
/// credentials are resolved once and reused. The KMS client is pinned to the
/// home region of the decryption key (injected via `KMS_KEY_REGION`); the
/// Secrets Manager client stays on the ambient default region of the host.
#[derive(Clone)]
pub struct AwsClients {
    /// KMS client used to decrypt the ciphertext blob.
    pub kms: aws_sdk_kms::Client,
    /// Secrets Manager client used to write the decrypted value.
    pub secretsmanager: aws_sdk_secretsmanager::Client,
}

impl AwsClients {
    /// Initialise both AWS SDK clients.
    ///
    /// Credentials are resolved via the standard AWS credential chain of the
    /// execution host.
    pub async fn init(kms_key_region: &str) -> Result<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let kms = aws_sdk_kms::Client::from_conf(
            aws_sdk_kms::config::Builder::from(&config)
                .region(Region::new(kms_key_region.to_owned()))
                .build(),
        );

        let secretsmanager = aws_sdk_secretsmanager::Client::new(&config);

        Ok(Self {
            kms,
            secretsmanager,
        })
    }
}

impl KmsDecrypt for aws_sdk_kms::Client {
    async fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let resp = self
            .decrypt()
            .key_id(key_id)
            .ciphertext_blob(aws_sdk_kms::primitives::Blob::new(ciphertext))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(e.into_service_error().to_string()))?;

        let plaintext = resp
            .plaintext()
            .context("KMS decrypt response contained no plaintext")?;
        Ok(plaintext.as_ref().to_vec())
    }
}

impl SecretValueWriter for aws_sdk_secretsmanager::Client {
    async fn put_secret_value(&self, secret_id: &str, secret_string: &str) -> Result<()> {
        self.put_secret_value()
            .secret_id(secret_id)
            .secret_string(secret_string)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(e.into_service_error().to_string()))?;
        Ok(())
    }
}
