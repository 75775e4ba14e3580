//! AWS IAM client wrapper for reading role policies
//!
//! A role's effective identity policies are its inline policies plus the
//! default version of every attached managed policy. Documents are returned
//! URL-decoded, inline policies first, each group in listing order.

use aws_sdk_iam::Client as IamClient;
use log::info;

use crate::error::{SourceError, SourceResult};

pub struct IamRoleSource {
    client: IamClient,
}

impl IamRoleSource {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    /// Create a source using the standard credential provider chain.
    ///
    /// `region` overrides the region resolved from the environment and profile.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(IamClient::new(&config))
    }

    /// Fetch every inline and attached policy document of a role
    pub async fn fetch_role_policies(&self, role_name: &str) -> SourceResult<Vec<String>> {
        let mut documents = Vec::new();

        for policy_name in self.list_inline_policies(role_name).await? {
            info!("Reading inline policy {policy_name} for role {role_name}");
            documents.push(self.get_inline_policy(role_name, &policy_name).await?);
        }

        for (policy_name, policy_arn) in self.list_attached_policies(role_name).await? {
            info!("Reading attached policy {policy_name} for role {role_name}");
            documents.push(self.get_attached_policy(&policy_arn).await?);
        }

        Ok(documents)
    }

    async fn list_inline_policies(&self, role_name: &str) -> SourceResult<Vec<String>> {
        let mut policy_names = Vec::new();
        let mut marker = None;
        loop {
            let response = self
                .client
                .list_role_policies()
                .role_name(role_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    SourceError::Iam(format!(
                        "Failed to list inline policies of role '{role_name}': {e}"
                    ))
                })?;

            policy_names.extend(response.policy_names);
            match response.marker {
                Some(next) if response.is_truncated => marker = Some(next),
                _ => break,
            }
        }
        Ok(policy_names)
    }

    async fn get_inline_policy(&self, role_name: &str, policy_name: &str) -> SourceResult<String> {
        let response = self
            .client
            .get_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
            .map_err(|e| {
                SourceError::Iam(format!(
                    "Failed to get inline policy '{policy_name}' of role '{role_name}': {e}"
                ))
            })?;
        decode_policy_document(&response.policy_document)
    }

    /// List `(name, arn)` of the managed policies attached to a role
    async fn list_attached_policies(&self, role_name: &str) -> SourceResult<Vec<(String, String)>> {
        let mut attached = Vec::new();
        let mut marker = None;
        loop {
            let response = self
                .client
                .list_attached_role_policies()
                .role_name(role_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    SourceError::Iam(format!(
                        "Failed to list attached policies of role '{role_name}': {e}"
                    ))
                })?;

            for policy in response.attached_policies() {
                let Some(arn) = policy.policy_arn() else {
                    continue;
                };
                let name = policy.policy_name().unwrap_or(arn);
                attached.push((name.to_string(), arn.to_string()));
            }
            match response.marker {
                Some(next) if response.is_truncated => marker = Some(next),
                _ => break,
            }
        }
        Ok(attached)
    }

    /// Read the default version of a managed policy
    async fn get_attached_policy(&self, policy_arn: &str) -> SourceResult<String> {
        let policy = self
            .client
            .get_policy()
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| SourceError::Iam(format!("Failed to get policy '{policy_arn}': {e}")))?;

        let version_id = policy
            .policy()
            .and_then(|policy| policy.default_version_id())
            .ok_or_else(|| {
                SourceError::Iam(format!("Policy '{policy_arn}' has no default version"))
            })?;

        let version = self
            .client
            .get_policy_version()
            .policy_arn(policy_arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| {
                SourceError::Iam(format!(
                    "Failed to get version {version_id} of policy '{policy_arn}': {e}"
                ))
            })?;

        let document = version
            .policy_version()
            .and_then(|version| version.document())
            .ok_or_else(|| {
                SourceError::Iam(format!(
                    "Version {version_id} of policy '{policy_arn}' has no document"
                ))
            })?;
        decode_policy_document(document)
    }
}

/// URL decode a policy document (IAM returns URL-encoded JSON)
pub(crate) fn decode_policy_document(encoded: &str) -> SourceResult<String> {
    percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| SourceError::Decode(format!("Failed to URL decode policy document: {e}")))
}
