//! Decrypt-and-store: the one operation the executor performs per invocation.
//!
//! The handler is a pure request/response operation with no retained state
//! between invocations. It is generic over its two collaborators so tests can
//! drive it with stubs and production wires in the AWS SDK clients.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::payload::{InvocationPayload, PayloadError};
use thiserror::Error;
use tracing::{error, info};

/// Minimal key-management surface the handler needs.
pub trait KmsDecrypt {
    /// Decrypt `ciphertext` with the key identified by `key_id`, returning
    /// the plaintext bytes.
    async fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> anyhow::Result<Vec<u8>>;
}

/// Minimal secret-store surface the handler needs.
pub trait SecretValueWriter {
    /// Write `secret_string` as the current value of the secret `secret_id`.
    async fn put_secret_value(&self, secret_id: &str, secret_string: &str) -> anyhow::Result<()>;
}

/// Errors fatal to a single invocation. Service failures carry the underlying
/// error text in their Display so the deployment engine surfaces it verbatim.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required payload field is blank. Checked before any network call.
    #[error(transparent)]
    MissingField(#[from] PayloadError),

    /// The cipherText field is not valid base64.
    #[error("cipherText is not valid base64: {0}")]
    InvalidCiphertext(base64::DecodeError),

    /// The key-management service rejected or failed the decrypt.
    #[error("decrypt failed: {0}")]
    Decrypt(anyhow::Error),

    /// The decrypted plaintext is not valid UTF-8 text.
    #[error("decrypted plaintext is not valid UTF-8")]
    Utf8Plaintext(std::string::FromUtf8Error),

    /// The secret store rejected the write.
    #[error("secret write failed: {0}")]
    Write(anyhow::Error),
}

/// Decrypts one invocation payload and stores the plaintext.
pub struct SecretSetHandler<D, W> {
    kms: D,
    secrets: W,
}

impl<D: KmsDecrypt, W: SecretValueWriter> SecretSetHandler<D, W> {
    pub fn new(kms: D, secrets: W) -> Self {
        Self { kms, secrets }
    }

    /// Handle one invocation: validate, decrypt, store.
    ///
    /// Either both service calls complete or the invocation fails as a whole;
    /// there is no partial-success state and no retry at this layer. Repeating
    /// the call with the same payload rewrites the same plaintext, so the
    /// operation is naturally idempotent across create/update events.
    ///
    /// # Errors
    ///
    /// See [`HandlerError`]; decrypt and write failures propagate the
    /// underlying service error text unchanged.
    pub async fn handle(&self, payload: &InvocationPayload) -> Result<(), HandlerError> {
        payload.validate()?;

        let ciphertext = STANDARD
            .decode(payload.cipher_text.trim())
            .map_err(HandlerError::InvalidCiphertext)?;

        info!("decrypting ciphertext blob");
        let plaintext = self
            .kms
            .decrypt(&payload.key_id, &ciphertext)
            .await
            .map_err(|e| {
                error!(error = %e, "decrypt failed");
                HandlerError::Decrypt(e)
            })?;

        let secret_string = String::from_utf8(plaintext).map_err(HandlerError::Utf8Plaintext)?;

        info!("writing secret value to secret store");
        self.secrets
            .put_secret_value(&payload.secret_arn, &secret_string)
            .await
            .map_err(|e| {
                error!(error = %e, "secret write failed");
                HandlerError::Write(e)
            })?;

        info!("secret decrypted and stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const SECRET: &str = "This is a secret";
    // base64("This is a secret")
    const CIPHER_TEXT: &str = "VGhpcyBpcyBhIHNlY3JldA==";

    fn payload() -> InvocationPayload {
        InvocationPayload {
            secret_arn: "arn:secret-arn".into(),
            key_id: "arn:kms-key-arn".into(),
            cipher_text: CIPHER_TEXT.into(),
        }
    }

    /// Records decrypt calls; returns fixed plaintext or a fixed error.
    #[derive(Clone, Default)]
    struct FakeKms {
        plaintext: Vec<u8>,
        fail_with: Option<String>,
        calls: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    }

    impl KmsDecrypt for FakeKms {
        async fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> anyhow::Result<Vec<u8>> {
            self.calls
                .lock()
                .unwrap()
                .push((key_id.to_owned(), ciphertext.to_vec()));
            match &self.fail_with {
                Some(msg) => anyhow::bail!("{msg}"),
                None => Ok(self.plaintext.clone()),
            }
        }
    }

    /// Records writes; optionally fails every call.
    #[derive(Clone, Default)]
    struct FakeSecretStore {
        fail_with: Option<String>,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl SecretValueWriter for FakeSecretStore {
        async fn put_secret_value(
            &self,
            secret_id: &str,
            secret_string: &str,
        ) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((secret_id.to_owned(), secret_string.to_owned()));
            match &self.fail_with {
                Some(msg) => anyhow::bail!("{msg}"),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn decrypts_and_puts_the_secret() {
        let kms = FakeKms {
            plaintext: SECRET.as_bytes().to_vec(),
            ..Default::default()
        };
        let store = FakeSecretStore::default();
        let handler = SecretSetHandler::new(kms.clone(), store.clone());

        handler.handle(&payload()).await.unwrap();

        let kms_calls = kms.calls.lock().unwrap();
        assert_eq!(kms_calls.len(), 1);
        assert_eq!(kms_calls[0].0, "arn:kms-key-arn");
        assert_eq!(kms_calls[0].1, SECRET.as_bytes());

        let writes = store.calls.lock().unwrap();
        assert_eq!(
            *writes,
            vec![("arn:secret-arn".to_owned(), SECRET.to_owned())]
        );
    }

    #[tokio::test]
    async fn decrypt_error_propagates_and_write_never_happens() {
        let kms = FakeKms {
            fail_with: Some("Error decrypting secret".into()),
            ..Default::default()
        };
        let store = FakeSecretStore::default();
        let handler = SecretSetHandler::new(kms, store.clone());

        let err = handler.handle(&payload()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Decrypt(_)));
        assert!(err.to_string().contains("Error decrypting secret"));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_error_propagates() {
        let kms = FakeKms {
            plaintext: SECRET.as_bytes().to_vec(),
            ..Default::default()
        };
        let store = FakeSecretStore {
            fail_with: Some("Error putting secret".into()),
            ..Default::default()
        };
        let handler = SecretSetHandler::new(kms, store);

        let err = handler.handle(&payload()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Write(_)));
        assert!(err.to_string().contains("Error putting secret"));
    }

    #[tokio::test]
    async fn blank_fields_fail_before_any_call() {
        let kms = FakeKms::default();
        let store = FakeSecretStore::default();
        let handler = SecretSetHandler::new(kms.clone(), store.clone());

        for field in ["secretArn", "keyId", "cipherText"] {
            let mut p = payload();
            match field {
                "secretArn" => p.secret_arn = String::new(),
                "keyId" => p.key_id = "   ".into(),
                _ => p.cipher_text = "\t".into(),
            }
            let err = handler.handle(&p).await.unwrap_err();
            assert!(
                matches!(err, HandlerError::MissingField(PayloadError::MissingField(f)) if f == field)
            );
        }
        assert!(kms.calls.lock().unwrap().is_empty());
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_base64_fails_before_decrypt() {
        let kms = FakeKms::default();
        let handler = SecretSetHandler::new(kms.clone(), FakeSecretStore::default());

        let mut p = payload();
        p.cipher_text = "not base64!!".into();
        let err = handler.handle(&p).await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidCiphertext(_)));
        assert!(kms.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_utf8_plaintext_is_rejected_before_write() {
        let kms = FakeKms {
            plaintext: vec![0xff, 0xfe, 0xfd],
            ..Default::default()
        };
        let store = FakeSecretStore::default();
        let handler = SecretSetHandler::new(kms, store.clone());

        let err = handler.handle(&payload()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Utf8Plaintext(_)));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_invocations_are_idempotent() {
        let kms = FakeKms {
            plaintext: SECRET.as_bytes().to_vec(),
            ..Default::default()
        };
        let store = FakeSecretStore::default();
        let handler = SecretSetHandler::new(kms, store.clone());

        handler.handle(&payload()).await.unwrap();
        handler.handle(&payload()).await.unwrap();

        let writes = store.calls.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
    }
}
