//! Deployment-time orchestration for encrypted secrets.
//!
//! This crate is the synthesis half of the system: it validates configuration,
//! resolves or declares a secret container, declares a single-instance decrypt
//! function with least-privilege grants, and registers lifecycle-triggered
//! invocations of that function carrying the encrypted payload. Nothing here
//! performs I/O — [`DeploymentUnit`] only accumulates a declarative resource
//! graph that the deployment engine executes later.
//!
//! Entry point: [`EncryptedSecret::build`].

pub mod custom_resource;
pub mod encrypted_secret;
pub mod function;
pub mod iam;
pub mod secret;
pub mod unit;

pub use encrypted_secret::{EncryptedSecret, SecretRequest, SynthesisError};
pub use function::RetentionDays;
pub use secret::{SecretContainer, SecretSpec};
pub use unit::DeploymentUnit;
