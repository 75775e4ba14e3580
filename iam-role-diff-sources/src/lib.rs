//! Sources of raw policy documents for IAM Role Diff:
//! - Inline and attached managed policies of an IAM role
//! - Local policy files selected by a glob pattern
//!

mod aws;
mod error;
mod local;

pub use aws::IamRoleSource;
pub use error::{SourceError, SourceResult};
pub use local::read_policy_files;

/// Where the two sides of a comparison are read from
pub enum PolicySource {
    /// Identifiers are IAM role names
    Iam(IamRoleSource),
    /// Identifiers are glob patterns of local policy files
    Local,
}

impl PolicySource {
    /// Fetch the raw policy documents for one side of a comparison
    pub async fn fetch(&self, identifier: &str) -> SourceResult<Vec<String>> {
        match self {
            Self::Iam(source) => source.fetch_role_policies(identifier).await,
            Self::Local => read_policy_files(identifier).await,
        }
    }
}
