//! Secret container declarations.

/// Template for generating an initial secret value at creation time.
///
/// Forwarded verbatim to the secret store; the decrypt function overwrites the
/// generated value with the decrypted plaintext on the first lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretStringGenerator {
    /// JSON template the generated value is merged into.
    pub secret_string_template: Option<String>,
    /// Key within the template that receives the generated string.
    pub generate_string_key: Option<String>,
}

/// Description of a secret container to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretSpec {
    /// Explicit secret name; the secret store assigns one when absent.
    pub secret_name: Option<String>,
    pub description: Option<String>,
    /// ARN of the customer-managed key that encrypts the stored value at rest.
    /// When absent the secret store's default key is used and no encrypt grant
    /// is derived.
    pub encryption_key: Option<String>,
    pub generate_secret_string: Option<SecretStringGenerator>,
}

/// The managed secret resource: either freshly declared from a [`SecretSpec`]
/// or a pre-existing container supplied by reference.
///
/// Never mutated after resolution; at runtime only the executor writes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretContainer {
    /// Identifier of the container. For newly declared containers this is an
    /// attribute-reference token the deployment engine resolves at deploy
    /// time; for existing containers it is the real ARN.
    pub arn: String,
    pub description: Option<String>,
    /// ARN of the associated encryption key, when the container has one.
    pub encryption_key: Option<String>,
}
