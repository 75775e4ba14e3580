//! Statement normalization

use crate::policy::{OneOrMany, Statement};

/// Put a statement into canonical form.
///
/// `Action` values are sorted lexicographically so statements that only differ
/// in the order their actions were listed serialize identically. Every other
/// field is returned as is, including malformed action strings.
#[must_use]
pub fn normalize(mut statement: Statement) -> Statement {
    if let Some(OneOrMany::Many(actions)) = statement.action.as_mut() {
        actions.sort();
    }
    statement
}
