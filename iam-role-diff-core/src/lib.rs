//! This crate provides the core logic of IAM Role Diff:
//! - Statement normalization and combining of policy documents into one canonical policy
//! - Alignment of the statements of two canonical policies
//! - Line-level diff rendering of the aligned statements
//!

mod align;
mod combine;
mod config;
mod error;
mod normalize;
mod policy;
mod render;
mod report;
mod serialize;

// Re-exports for a small, focused public API
pub use align::{resource_service, AlignedStatement, Aligner, GreedyAligner, PairingDecision};
pub use combine::{combine, StatementSet};
pub use config::{DiffConfig, DEFAULT_MAX_DISTANCE, MAX_DISTANCE_ENV};
pub use error::{AlignError, AlignResult, CompareError, RenderError, Side};
pub use normalize::normalize;
pub use policy::{OneOrMany, Policy, PolicyDocument, Statement, COMBINED_POLICY_ID, POLICY_VERSION};
pub use render::{DiffRenderer, LineDiffRenderer};
pub use report::{compare, render_report, CompareSummary};
pub use serialize::to_indented_json;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_and_compare_sample_roles() {
        let old = combine([
            r#"{"Version": "2012-10-17", "Statement": {"Effect": "Allow", "Action": ["s3:PutObject", "s3:GetObject"], "Resource": "arn:aws:s3:::my-bucket/*"}}"#,
        ]);
        let new = combine([
            r#"{"Version": "2012-10-17", "Statement": {"Effect": "Allow", "Action": ["s3:GetObject", "s3:PutObject"], "Resource": "arn:aws:s3:::my-bucket/*"}}"#,
        ]);
        assert_eq!(old, new);

        let mut out = Vec::new();
        let summary = compare(
            &old,
            &new,
            &GreedyAligner::default(),
            &LineDiffRenderer::plain(),
            &mut out,
        )
        .expect("should compare");
        assert_eq!(summary.matched, 1);
        assert_eq!(String::from_utf8_lossy(&out), "[AWS Service: s3]\n");
    }
}
