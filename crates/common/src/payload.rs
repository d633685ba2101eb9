//! The invocation payload exchanged between the lifecycle dispatcher and the
//! executor.
//!
//! This is the only contract connecting the two halves of the system: the
//! orchestrator serialises one payload per lifecycle action at synthesis time,
//! and the executor deserialises and validates it at the start of every
//! invocation. Field names on the wire are fixed camelCase JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when validating a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// A required field is absent, empty, or whitespace-only.
    #[error("missing required field: {0} must not be blank")]
    MissingField(&'static str),
}

/// Message passed to the executor at each lifecycle event.
///
/// Serialises as `{"secretArn": ..., "keyId": ..., "cipherText": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationPayload {
    /// ARN of the secret that will receive the decrypted value.
    pub secret_arn: String,
    /// ARN of the KMS key to decrypt with.
    pub key_id: String,
    /// Base64-encoded ciphertext.
    pub cipher_text: String,
}

impl InvocationPayload {
    /// Check that all three fields are non-blank after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), PayloadError> {
        ensure_present(&self.secret_arn, "secretArn")?;
        ensure_present(&self.key_id, "keyId")?;
        ensure_present(&self.cipher_text, "cipherText")?;
        Ok(())
    }

    /// Serialise this payload to its canonical JSON wire form.
    pub fn to_json(&self) -> String {
        // Serialising a struct of plain strings cannot fail.
        serde_json::to_string(self).expect("InvocationPayload serialisation is infallible")
    }
}

fn ensure_present(value: &str, field: &'static str) -> Result<(), PayloadError> {
    if value.trim().is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> InvocationPayload {
        InvocationPayload {
            secret_arn: "arn:secret-arn".into(),
            key_id: "arn:kms-key-arn".into(),
            cipher_text: "VGhpcyBpcyBhIHNlY3JldA==".into(),
        }
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let json = payload().to_json();
        assert!(json.contains("\"secretArn\""));
        assert!(json.contains("\"keyId\""));
        assert!(json.contains("\"cipherText\""));
    }

    #[test]
    fn json_round_trip() {
        let p = payload();
        let decoded: InvocationPayload = serde_json::from_str(&p.to_json()).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn deserialises_wire_form() {
        let decoded: InvocationPayload = serde_json::from_str(
            r#"{"secretArn": "arn:s", "keyId": "arn:k", "cipherText": "Zm9v"}"#,
        )
        .unwrap();
        assert_eq!(decoded.secret_arn, "arn:s");
        assert_eq!(decoded.key_id, "arn:k");
        assert_eq!(decoded.cipher_text, "Zm9v");
    }

    #[test]
    fn validate_accepts_complete_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn validate_names_blank_field() {
        let mut p = payload();
        p.secret_arn = "".into();
        assert_eq!(p.validate(), Err(PayloadError::MissingField("secretArn")));

        let mut p = payload();
        p.key_id = "   ".into();
        assert_eq!(p.validate(), Err(PayloadError::MissingField("keyId")));

        let mut p = payload();
        p.cipher_text = "\t\n".into();
        assert_eq!(p.validate(), Err(PayloadError::MissingField("cipherText")));
    }
}
