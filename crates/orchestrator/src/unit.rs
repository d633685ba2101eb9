//! [`DeploymentUnit`]: the declarative resource graph built during synthesis.
//!
//! A deployment unit collects every resource declaration made while the
//! deployment plan is evaluated. It performs no I/O; the deployment engine
//! consumes the accumulated records after synthesis completes. Attributes of
//! not-yet-deployed resources (ARNs, function names) are represented as
//! reference tokens the engine resolves at deploy time.

use std::collections::HashMap;

use crate::custom_resource::CustomResourceSpec;
use crate::function::FunctionSpec;
use crate::iam::PolicyStatement;
use crate::secret::{SecretContainer, SecretSpec};

/// Handle to a function declared in a [`DeploymentUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionId(usize);

/// Handle to a custom resource declared in a [`DeploymentUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomResourceId(usize);

/// A declared secret container together with its forwarded spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub logical_id: String,
    pub spec: SecretSpec,
    /// Reference token standing in for the container's ARN.
    pub arn: String,
}

/// A declared function together with the policy statements attached to its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub logical_id: String,
    pub spec: FunctionSpec,
    pub role_policy: Vec<PolicyStatement>,
}

/// An amendment to a key's access policy granting a function use of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPolicyGrant {
    /// ARN of the key whose policy is amended.
    pub key_arn: String,
    /// Logical id of the function principal being granted access.
    pub grantee: String,
    /// Actions granted, e.g. `kms:Encrypt`.
    pub actions: Vec<String>,
}

/// A declared custom resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomResourceRecord {
    pub logical_id: String,
    pub spec: CustomResourceSpec,
}

/// Permission for one declared resource to invoke a declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeGrant {
    /// Logical id of the invokable function.
    pub function: String,
    /// Logical id of the invoking principal.
    pub grantee: String,
}

/// Accumulates resource declarations for one deployment unit.
///
/// Synthesis is single-threaded and synchronous, so all mutation happens
/// through `&mut self`; there is no interior mutability or locking.
#[derive(Debug, Default)]
pub struct DeploymentUnit {
    name: String,
    secrets: Vec<SecretRecord>,
    functions: Vec<FunctionRecord>,
    // Singleton registry: uuid -> already-declared function.
    singletons: HashMap<String, FunctionId>,
    key_policy_grants: Vec<KeyPolicyGrant>,
    custom_resources: Vec<CustomResourceRecord>,
    invoke_grants: Vec<InvokeGrant>,
}

impl DeploymentUnit {
    /// Create an empty deployment unit named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name of this deployment unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a new secret container from `spec`.
    ///
    /// The returned container's ARN is a reference token resolved by the
    /// deployment engine once the container actually exists.
    pub fn declare_secret(&mut self, logical_id: impl Into<String>, spec: SecretSpec) -> SecretContainer {
        let logical_id = logical_id.into();
        let arn = self.attr_token(&logical_id, "Arn");
        let container = SecretContainer {
            arn: arn.clone(),
            description: spec.description.clone(),
            encryption_key: spec.encryption_key.clone(),
        };
        self.secrets.push(SecretRecord {
            logical_id,
            spec,
            arn,
        });
        container
    }

    /// Declare a single-instance function, deduplicated on `spec.uuid`.
    ///
    /// The first call for a given uuid declares the function; subsequent calls
    /// return the existing handle and `spec` is discarded. This guarantees at
    /// most one physical instance per uuid regardless of how often the
    /// declaring code runs within the unit.
    pub fn singleton_function(&mut self, spec: FunctionSpec) -> FunctionId {
        if let Some(&id) = self.singletons.get(&spec.uuid) {
            return id;
        }
        let logical_id = format!("{}{}", spec.purpose, &spec.uuid[..8.min(spec.uuid.len())]);
        let id = FunctionId(self.functions.len());
        self.singletons.insert(spec.uuid.clone(), id);
        self.functions.push(FunctionRecord {
            logical_id,
            spec,
            role_policy: Vec::new(),
        });
        id
    }

    /// Attach a policy statement to the role of function `id`.
    pub fn add_to_role_policy(&mut self, id: FunctionId, statement: PolicyStatement) {
        self.functions[id.0].role_policy.push(statement);
    }

    /// Amend the access policy of the key at `key_arn` to let function `id`
    /// use it for encryption.
    pub fn grant_key_encrypt(&mut self, key_arn: impl Into<String>, id: FunctionId) {
        let grantee = self.functions[id.0].logical_id.clone();
        self.key_policy_grants.push(KeyPolicyGrant {
            key_arn: key_arn.into(),
            grantee,
            actions: vec!["kms:Encrypt".into()],
        });
    }

    /// Register a lifecycle-triggered custom resource.
    pub fn register_custom_resource(
        &mut self,
        logical_id: impl Into<String>,
        spec: CustomResourceSpec,
    ) -> CustomResourceId {
        let id = CustomResourceId(self.custom_resources.len());
        self.custom_resources.push(CustomResourceRecord {
            logical_id: logical_id.into(),
            spec,
        });
        id
    }

    /// Grant custom resource `grantee` permission to invoke function `id`.
    pub fn grant_invoke(&mut self, id: FunctionId, grantee: CustomResourceId) {
        self.invoke_grants.push(InvokeGrant {
            function: self.functions[id.0].logical_id.clone(),
            grantee: self.custom_resources[grantee.0].logical_id.clone(),
        });
    }

    /// Reference token for the name of function `id`.
    pub fn function_name_token(&self, id: FunctionId) -> String {
        self.attr_token(&self.functions[id.0].logical_id, "Name")
    }

    /// Reference token for the ARN of function `id`.
    pub fn function_arn_token(&self, id: FunctionId) -> String {
        self.attr_token(&self.functions[id.0].logical_id, "Arn")
    }

    // -----------------------------------------------------------------------
    // Inspection — consumed by the deployment engine and by tests
    // -----------------------------------------------------------------------

    pub fn secrets(&self) -> &[SecretRecord] {
        &self.secrets
    }

    pub fn functions(&self) -> &[FunctionRecord] {
        &self.functions
    }

    pub fn function(&self, id: FunctionId) -> &FunctionRecord {
        &self.functions[id.0]
    }

    pub fn key_policy_grants(&self) -> &[KeyPolicyGrant] {
        &self.key_policy_grants
    }

    pub fn custom_resources(&self) -> &[CustomResourceRecord] {
        &self.custom_resources
    }

    pub fn invoke_grants(&self) -> &[InvokeGrant] {
        &self.invoke_grants
    }

    /// Deferred attribute reference: `${<unit>/<logical-id>.<attr>}`.
    fn attr_token(&self, logical_id: &str, attr: &str) -> String {
        format!("${{{}/{}.{}}}", self.name, logical_id, attr)
    }
}
