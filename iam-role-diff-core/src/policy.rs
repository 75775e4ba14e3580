//! IAM policy document model
//!
//! Only the fields needed to normalize, combine and align statements are
//! interpreted. `Principal`, `NotPrincipal` and `Condition` are carried as
//! opaque JSON so they survive a round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Policy language version stamped on every combined policy
pub const POLICY_VERSION: &str = "2012-10-17";

/// Id stamped on every combined policy. Provenance of individual statements is not kept.
pub const COMBINED_POLICY_ID: &str = "combined";

/// A policy field that may be written either as a single value or as a list.
///
/// The shape is preserved, so `"Action": "s3:GetObject"` serializes back as a
/// string and `"Action": ["s3:GetObject"]` as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// A single permission statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_principal: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_action: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_resource: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
}

impl Statement {
    /// Create an `Allow` statement with list-shaped `Action` and `Resource`
    pub fn allow(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self::new("Allow", actions, resources)
    }

    /// Create a `Deny` statement with list-shaped `Action` and `Resource`
    pub fn deny(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self::new("Deny", actions, resources)
    }

    fn new(effect: &str, actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            sid: None,
            effect: effect.to_string(),
            principal: None,
            not_principal: None,
            action: Some(actions.into()),
            not_action: None,
            resource: Some(resources.into()),
            not_resource: None,
            condition: None,
        }
    }

    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Value) -> Self {
        self.condition = Some(condition);
        self
    }

    /// `Action` values, empty when the statement has none
    pub fn actions(&self) -> &[String] {
        self.action.as_ref().map_or(&[], OneOrMany::as_slice)
    }

    /// `Resource` values, empty when the statement has none
    pub fn resources(&self) -> &[String] {
        self.resource.as_ref().map_or(&[], OneOrMany::as_slice)
    }

    /// Service prefix of the first action, e.g. `s3` for `s3:GetObject`.
    ///
    /// Returns `None` for statements without any `Action` value.
    pub fn action_service(&self) -> Option<&str> {
        self.actions()
            .first()
            .map(|action| action.split_once(':').map_or(action.as_str(), |(service, _)| service))
    }
}

/// A policy document as found in IAM or on disk
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub statement: OneOrMany<Statement>,
}

/// The canonical result of combining policy documents.
///
/// Statements are deduplicated and ordered by the service of their first
/// action. A `Policy` can only be built by the combiner and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    version: String,
    id: String,
    #[serde(rename = "Statement")]
    statements: Vec<Statement>,
}

impl Policy {
    pub(crate) fn combined(statements: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            id: COMBINED_POLICY_ID.to_string(),
            statements,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
