//! [`EncryptedSecret`]: validate, provision, wire, and register exactly one
//! decrypt-and-populate operation per deployment unit.

use std::collections::BTreeMap;

use common::arn::Arn;
use common::payload::InvocationPayload;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::custom_resource::{CustomResourceSpec, SdkCall};
use crate::function::{Architecture, FunctionSpec, LogGroupSpec, RemovalPolicy, RetentionDays};
use crate::iam::PolicyStatement;
use crate::secret::{SecretContainer, SecretSpec};
use crate::unit::{DeploymentUnit, FunctionId};

/// Purpose label of the singleton decrypt function.
pub const FUNCTION_PURPOSE: &str = "DecryptSecret";

/// Name of the executor artifact the function runs.
pub const EXECUTOR_HANDLER: &str = "decrypt-secret-executor";

/// Environment variable carrying the KMS key's home region to the executor.
pub const KMS_KEY_REGION_VAR: &str = "KMS_KEY_REGION";

/// Errors produced during synthesis. All are fatal to construction: no partial
/// resource graph is declared when any precondition fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    /// The key identifier does not satisfy the ARN grammar.
    #[error("invalid key identifier: {0}")]
    InvalidKeyIdentifier(String),

    /// The ciphertext blob is empty.
    #[error("ciphertext blob must not be empty")]
    EmptyCiphertext,
}

/// Construction input for [`EncryptedSecret::build`]. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SecretRequest {
    /// ARN of the KMS key the ciphertext was encrypted with.
    pub key_id: String,
    /// Base64-encoded ciphertext produced out-of-band.
    pub ciphertext_blob: String,
    /// Spec for a secret container to create. Ignored when `existing_secret`
    /// is supplied; absent means container defaults.
    pub secret_spec: Option<SecretSpec>,
    /// Pre-existing container to populate instead of creating one.
    pub existing_secret: Option<SecretContainer>,
    /// Log retention for the decrypt function; defaults to one week.
    pub log_retention: Option<RetentionDays>,
}

/// Result of orchestrating one encrypted secret.
#[derive(Debug)]
pub struct EncryptedSecret {
    /// The resolved secret container — the public output of construction.
    pub secret: SecretContainer,
    function: FunctionId,
}

impl EncryptedSecret {
    /// Synthesise the decrypt-and-populate declaration for `request` into `unit`.
    ///
    /// Declares (or reuses) the secret container, declares the singleton
    /// decrypt function with least-privilege grants, and registers the
    /// create/update lifecycle invocations carrying the encrypted payload.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::InvalidKeyIdentifier`] if `key_id` fails the
    /// ARN grammar, then [`SynthesisError::EmptyCiphertext`] if the blob is
    /// empty. Nothing is declared into `unit` on failure.
    pub fn build(
        unit: &mut DeploymentUnit,
        id: &str,
        request: SecretRequest,
    ) -> Result<Self, SynthesisError> {
        let key = Arn::parse(&request.key_id)
            .map_err(|_| SynthesisError::InvalidKeyIdentifier(request.key_id.clone()))?;

        if request.ciphertext_blob.is_empty() {
            return Err(SynthesisError::EmptyCiphertext);
        }

        // Resolve the container: borrow the existing one or declare a new one.
        let secret = match request.existing_secret {
            Some(existing) => existing,
            None => unit.declare_secret(
                format!("{id}/Secrets"),
                request.secret_spec.unwrap_or_default(),
            ),
        };

        // One decrypt function per deployment unit, shared by every
        // EncryptedSecret declared within it.
        let mut environment = BTreeMap::new();
        environment.insert(KMS_KEY_REGION_VAR.to_owned(), key.region);
        let function = unit.singleton_function(FunctionSpec {
            purpose: FUNCTION_PURPOSE.into(),
            uuid: singleton_uuid(unit.name()),
            handler: EXECUTOR_HANDLER.into(),
            memory_size_mb: 128,
            architecture: Architecture::Arm64,
            environment,
            log_group: LogGroupSpec {
                retention: request.log_retention.unwrap_or_default(),
                removal_policy: RemovalPolicy::Destroy,
            },
        });

        unit.add_to_role_policy(
            function,
            PolicyStatement::new(["kms:Decrypt"], [request.key_id.clone()]),
        );
        unit.add_to_role_policy(
            function,
            PolicyStatement::new(["secretsmanager:PutSecretValue"], [secret.arn.clone()]),
        );

        // The encrypt grant exists iff the container has an associated key:
        // with no key there is nothing to re-encrypt the stored value with.
        if let Some(encryption_key) = &secret.encryption_key {
            unit.add_to_role_policy(
                function,
                PolicyStatement::new(["kms:Encrypt"], [encryption_key.clone()]),
            );
            unit.grant_key_encrypt(encryption_key.clone(), function);
        }

        let payload = InvocationPayload {
            secret_arn: secret.arn.clone(),
            key_id: request.key_id,
            cipher_text: request.ciphertext_blob,
        }
        .to_json();

        let function_name = unit.function_name_token(function);
        let invocation = unit.register_custom_resource(
            format!("{id}/CustomResourceSecretLambdaInvoke"),
            CustomResourceSpec {
                on_create: SdkCall::lambda_invoke(function_name.clone(), payload.clone()),
                on_update: SdkCall::lambda_invoke(function_name, payload),
                policy_resources: vec![unit.function_arn_token(function)],
            },
        );
        unit.grant_invoke(function, invocation);

        Ok(Self { secret, function })
    }

    /// Handle to the singleton decrypt function backing this secret.
    pub fn function_id(&self) -> FunctionId {
        self.function
    }
}

/// Stable singleton identity: hex SHA-256 of the deployment-unit name.
fn singleton_uuid(unit_name: &str) -> String {
    let digest = Sha256::digest(unit_name.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
