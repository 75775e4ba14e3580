use iam_role_diff_core::{combine, normalize, to_indented_json, Statement};
use proptest::prelude::*;

const ROLE_INLINE: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Effect": "Allow",
            "Action": ["s3:PutObject", "s3:GetObject"],
            "Resource": ["arn:aws:s3:::app-bucket/*"]
        },
        {
            "Effect": "Allow",
            "Action": "iam:PassRole",
            "Resource": "arn:aws:iam::123456789012:role/app-task",
            "Condition": {"StringEquals": {"iam:PassedToService": "ecs-tasks.amazonaws.com"}}
        }
    ]
}"#;

const ROLE_ATTACHED: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Effect": "Allow",
            "Action": ["ec2:DescribeSubnets", "ec2:DescribeInstances"],
            "Resource": "arn:aws:ec2:us-west-2:123456789012:instance/*"
        },
        {
            "Effect": "Allow",
            "Action": ["s3:GetObject", "s3:PutObject"],
            "Resource": ["arn:aws:s3:::app-bucket/*"]
        }
    ]
}"#;

fn service_order(statements: &[Statement]) -> Vec<&str> {
    statements
        .iter()
        .filter_map(Statement::action_service)
        .collect()
}

#[test]
fn combine_is_idempotent() {
    let policy = combine([ROLE_INLINE, ROLE_ATTACHED]);
    let serialized = to_indented_json(&policy).expect("policy should serialize");

    let recombined = combine([serialized]);
    assert_eq!(recombined.statements(), policy.statements());
}

#[test]
fn combine_is_deterministic() {
    let first = to_indented_json(&combine([ROLE_INLINE, ROLE_ATTACHED])).expect("should serialize");
    for _ in 0..5 {
        let again =
            to_indented_json(&combine([ROLE_INLINE, ROLE_ATTACHED])).expect("should serialize");
        assert_eq!(first, again);
    }
}

#[test]
fn combine_deduplicates_copies() {
    let once = combine([ROLE_INLINE]);
    let many = combine(std::iter::repeat(ROLE_INLINE).take(7));
    assert_eq!(many.len(), once.len());
    assert_eq!(many.statements(), once.statements());
}

#[test]
fn combine_merges_overlapping_sources() {
    // the s3 statement appears in both documents with its actions in a different order
    let policy = combine([ROLE_INLINE, ROLE_ATTACHED]);
    assert_eq!(policy.len(), 3);
    assert_eq!(service_order(policy.statements()), ["ec2", "iam", "s3"]);
    assert_eq!(
        policy.statements()[0].actions(),
        ["ec2:DescribeInstances", "ec2:DescribeSubnets"]
    );
}

#[test]
fn combine_sorts_by_first_action_service() {
    let doc = r#"{"Statement": [
        {"Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::b/*"},
        {"Effect": "Allow", "Action": "ec2:StartInstances", "Resource": "arn:aws:ec2:us-east-1:123456789012:instance/*"},
        {"Effect": "Allow", "Action": "iam:GetRole", "Resource": "arn:aws:iam::123456789012:role/x"}
    ]}"#;
    let policy = combine([doc]);
    assert_eq!(service_order(policy.statements()), ["ec2", "iam", "s3"]);
}

#[test]
fn combined_policy_serializes_as_policy_document() {
    let policy = combine([ROLE_ATTACHED]);
    let value = serde_json::to_value(&policy).expect("should serialize");
    assert_eq!(value["Version"], "2012-10-17");
    assert_eq!(value["Id"], "combined");
    assert_eq!(value["Statement"].as_array().map(Vec::len), Some(2));
}

fn action_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}:[A-Za-z]{1,12}", 0..8)
}

proptest! {
    #[test]
    fn action_order_does_not_survive_normalization(actions in action_strategy(), seed in any::<u64>()) {
        let mut shuffled = actions.clone();
        // deterministic rotation + reversal is enough to reorder the list
        if !shuffled.is_empty() {
            let len = shuffled.len();
            let shift = usize::try_from(seed % (len as u64)).unwrap_or(0);
            shuffled.rotate_left(shift);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        let resources = vec!["arn:aws:s3:::bucket/*".to_string()];
        let a = normalize(Statement::allow(actions, resources.clone()));
        let b = normalize(Statement::allow(shuffled, resources));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn normalized_actions_are_sorted(actions in action_strategy()) {
        let normalized = normalize(Statement::allow(actions, vec!["*".to_string()]));
        let sorted = normalized.actions().windows(2).all(|pair| pair[0] <= pair[1]);
        prop_assert!(sorted);
    }

    #[test]
    fn combine_never_duplicates(copies in 1usize..5) {
        let docs = std::iter::repeat(ROLE_ATTACHED).take(copies);
        let policy = combine(docs);
        prop_assert_eq!(policy.len(), 2);
    }
}
