//! Stable textual form of statements and policies
//!
//! Statements are compared and diffed as tab-indented JSON. Field order is
//! fixed by the struct definitions and opaque objects (`Condition`,
//! `Principal`) use sorted keys, so equal values always produce equal bytes.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize a value as JSON indented with tabs
pub fn to_indented_json<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Statement;
    use serde_json::json;

    #[test]
    fn test_statement_layout() {
        let statement = Statement::allow(
            vec!["s3:GetObject".to_string()],
            vec!["arn:aws:s3:::bucket/*".to_string()],
        );
        let text = to_indented_json(&statement).expect("should serialize");
        assert_eq!(
            text,
            "{\n\t\"Effect\": \"Allow\",\n\t\"Action\": [\n\t\t\"s3:GetObject\"\n\t],\n\t\"Resource\": [\n\t\t\"arn:aws:s3:::bucket/*\"\n\t]\n}"
        );
    }

    #[test]
    fn test_condition_keys_are_sorted() {
        let a = Statement::allow(vec!["s3:GetObject".to_string()], vec!["*".to_string()])
            .with_condition(json!({"StringEquals": {"b": "1", "a": "2"}}));
        let b: Statement = serde_json::from_str(
            r#"{"Effect":"Allow","Action":["s3:GetObject"],"Resource":["*"],"Condition":{"StringEquals":{"a":"2","b":"1"}}}"#,
        )
        .expect("should parse");

        assert_eq!(
            to_indented_json(&a).expect("should serialize"),
            to_indented_json(&b).expect("should serialize")
        );
    }
}
