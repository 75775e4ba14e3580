//! Combining raw policy documents into one canonical policy

use log::{debug, info, warn};
use std::cmp::Ordering;

use crate::normalize::normalize;
use crate::policy::{Policy, PolicyDocument, Statement};

/// Insertion-ordered set of statements.
///
/// Equality is structural, so a statement that already appears (after
/// normalization) is not added again. Insertion order is kept and later
/// serves as the tie-break of the stable sort in [`combine`].
#[derive(Debug, Default, Clone)]
pub struct StatementSet {
    statements: Vec<Statement>,
}

impl StatementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement, returning `false` if an equal one is already present
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            return false;
        }
        self.statements.push(statement);
        true
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn values(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_values(self) -> Vec<Statement> {
        self.statements
    }
}

/// Merge the policy documents of one side into a single canonical [`Policy`].
///
/// Documents that fail to parse are logged and contribute no statements.
/// Statements are normalized, deduplicated across all documents and sorted by
/// the service of their first action. Statements without any action are
/// placed last in the order they were first seen.
pub fn combine<I, S>(docs: I) -> Policy
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut combined = StatementSet::new();

    for (index, doc) in docs.into_iter().enumerate() {
        let document: PolicyDocument = match serde_json::from_str(doc.as_ref()) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping policy document {index}: failed to parse: {e}");
                continue;
            }
        };

        let mut added = 0;
        for statement in document.statement.into_vec() {
            if combined.insert(normalize(statement)) {
                added += 1;
            }
        }
        debug!("Policy document {index} contributed {added} new statement(s)");
    }

    let mut statements = combined.into_values();
    let actionless = statements
        .iter()
        .filter(|statement| statement.action_service().is_none())
        .count();
    if actionless > 0 {
        warn!("{actionless} statement(s) without Action placed at the end of the combined policy");
    }
    statements.sort_by(|a, b| compare_action_service(a.action_service(), b.action_service()));

    info!("Combined policy has {} distinct statement(s)", statements.len());
    Policy::combined(statements)
}

/// Ascending by service name, with action-less statements last
fn compare_action_service(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
