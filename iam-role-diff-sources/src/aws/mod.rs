//! AWS SDK integration: reading the policies attached to an IAM role.

pub(crate) mod iam_client;

pub use iam_client::IamRoleSource;
