//! AWS SDK client bundle and trait implementations.

mod clients;

pub use clients::AwsClients;
