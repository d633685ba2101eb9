//! Lifecycle-triggered custom resource declarations.
//!
//! A custom resource tells the deployment engine to perform an SDK call when
//! the owning resource is created or updated. Both actions use the same fixed
//! physical resource id so the engine treats repeated invocations as updates
//! to one logical side effect rather than new resources. No delete action is
//! registered: removing the secret container does not scrub the stored value.

use serde_json::json;

/// Fixed physical resource id shared by the create and update actions.
pub const PHYSICAL_RESOURCE_ID: &str = "CustomResourceSecretLambdaInvoke";

/// One SDK call the deployment engine performs on a lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkCall {
    /// Service namespace, e.g. `Lambda`.
    pub service: String,
    /// API action, e.g. `invoke`.
    pub action: String,
    /// Call parameters as they appear on the wire.
    pub parameters: serde_json::Value,
    /// Token correlating repeated calls as one logical side effect.
    pub physical_resource_id: String,
}

impl SdkCall {
    /// Declare a `Lambda.invoke` of `function_name` with a JSON `payload`.
    pub fn lambda_invoke(function_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            service: "Lambda".into(),
            action: "invoke".into(),
            parameters: json!({
                "FunctionName": function_name.into(),
                "Payload": payload.into(),
            }),
            physical_resource_id: PHYSICAL_RESOURCE_ID.into(),
        }
    }
}

/// Custom resource bound to the create and update lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomResourceSpec {
    pub on_create: SdkCall,
    pub on_update: SdkCall,
    /// Resources the custom resource's own execution policy is scoped to.
    pub policy_resources: Vec<String>,
}
