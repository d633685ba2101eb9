//! Amazon Resource Name parsing and validation.
//!
//! The orchestrator validates the decryption-key identifier with [`Arn::validate`]
//! and extracts its `region` segment, which is injected into the executor's
//! environment so the KMS client can be pointed at the key's home region.

use std::fmt;

use thiserror::Error;

/// Errors produced when parsing an ARN string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArnError {
    /// The string does not contain the six colon-separated ARN segments.
    #[error("ARN must have six colon-separated segments: {0}")]
    SegmentCount(String),

    /// The string does not start with the literal `arn` prefix.
    #[error("ARN must start with 'arn:': {0}")]
    MissingPrefix(String),

    /// A segment that must be present is empty.
    #[error("ARN {segment} segment must not be empty: {arn}")]
    EmptySegment {
        /// Name of the offending segment.
        segment: &'static str,
        /// The full input string.
        arn: String,
    },
}

/// A parsed Amazon Resource Name: `arn:partition:service:region:account:resource`.
///
/// The `resource` segment keeps any further colons verbatim (some services use
/// `resource-type:resource-id` rather than a `/` separator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    /// Partition, e.g. `aws` or `aws-cn`.
    pub partition: String,
    /// Service namespace, e.g. `kms` or `secretsmanager`.
    pub service: String,
    /// Region, e.g. `us-west-2`. May be empty for global resources.
    pub region: String,
    /// Account id. May be empty for some resource classes.
    pub account: String,
    /// Resource path, e.g. `key/483291fd-92ad-4dde-af8b-e4203b013258`.
    pub resource: String,
}

impl Arn {
    /// Parse an ARN string into its segments.
    ///
    /// # Errors
    ///
    /// Returns an [`ArnError`] if the string does not have six segments, lacks
    /// the `arn` prefix, or has an empty partition, service, or resource
    /// segment. Region and account are allowed to be empty.
    pub fn parse(s: &str) -> Result<Self, ArnError> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 {
            return Err(ArnError::SegmentCount(s.to_owned()));
        }
        if parts[0] != "arn" {
            return Err(ArnError::MissingPrefix(s.to_owned()));
        }
        for (segment, value) in [
            ("partition", parts[1]),
            ("service", parts[2]),
            ("resource", parts[5]),
        ] {
            if value.is_empty() {
                return Err(ArnError::EmptySegment {
                    segment,
                    arn: s.to_owned(),
                });
            }
        }
        Ok(Self {
            partition: parts[1].to_owned(),
            service: parts[2].to_owned(),
            region: parts[3].to_owned(),
            account: parts[4].to_owned(),
            resource: parts[5].to_owned(),
        })
    }

    /// Structural validity predicate: `true` iff [`Arn::parse`] would succeed.
    pub fn validate(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KMS_KEY_ARN: &str =
        "arn:aws:kms:us-west-2:012345678901:key/483291fd-92ad-4dde-af8b-e4203b013258";

    #[test]
    fn parse_kms_key_arn() {
        let arn = Arn::parse(KMS_KEY_ARN).unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "kms");
        assert_eq!(arn.region, "us-west-2");
        assert_eq!(arn.account, "012345678901");
        assert_eq!(arn.resource, "key/483291fd-92ad-4dde-af8b-e4203b013258");
    }

    #[test]
    fn resource_segment_keeps_colons() {
        let arn =
            Arn::parse("arn:aws:secretsmanager:eu-west-1:012345678901:secret:my-secret-AbCdEf")
                .unwrap();
        assert_eq!(arn.resource, "secret:my-secret-AbCdEf");
    }

    #[test]
    fn validate_rejects_garbage() {
        assert!(!Arn::validate("asdfasdf"));
    }

    #[test]
    fn validate_rejects_missing_prefix() {
        assert!(!Arn::validate("foo:aws:kms:us-west-2:012345678901:key/abc"));
    }

    #[test]
    fn validate_rejects_empty_service() {
        assert!(!Arn::validate("arn:aws::us-west-2:012345678901:key/abc"));
    }

    #[test]
    fn empty_region_is_allowed() {
        let arn = Arn::parse("arn:aws:iam::012345678901:role/my-role").unwrap();
        assert_eq!(arn.region, "");
    }

    #[test]
    fn display_round_trips() {
        let arn = Arn::parse(KMS_KEY_ARN).unwrap();
        assert_eq!(arn.to_string(), KMS_KEY_ARN);
    }
}
