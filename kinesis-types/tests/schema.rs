//! Boundary behaviour of the declarative argument schema.

use std::sync::LazyLock;

use kinesis_types::*;
use proptest::prelude::*;
use serde_json::{Value, json};

static DIGITS: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"^\d+$", "digits"));

const ITERATORS: &[&str] = &["AT_SEQUENCE_NUMBER", "AFTER_SEQUENCE_NUMBER", "LATEST"];

fn record() -> ArgSchema {
    ArgSchema::new()
        .field(Field::string("Data").required())
        .field(Field::string("PartitionKey").len(1, 256).required())
        .field(Field::string("ExplicitHashKey").pattern(&DIGITS))
}

fn put() -> ArgSchema {
    ArgSchema::new()
        .field(Field::list("records", Kind::Object(record()), 1, 500).required())
        .field(Field::map(
            "tags",
            2,
            StringKind {
                min_len: 1,
                max_len: Some(8),
                reserved_prefix: Some("aws:"),
                ..StringKind::default()
            },
            StringKind {
                max_len: Some(3),
                ..StringKind::default()
            },
        ))
        .field(Field::one_of("iterator", ITERATORS))
        .field(Field::string("sequence"))
        .field(Field::timestamp("at"))
        .rule(Rule::RequiredWhen {
            field: "sequence",
            when: "iterator",
            is_one_of: &["AT_SEQUENCE_NUMBER", "AFTER_SEQUENCE_NUMBER"],
        })
}

fn message(input: Value) -> String {
    put().validate(input).unwrap_err().message()
}

#[test]
fn nested_paths_name_the_offending_item() {
    let msg = message(json!({"records": [
        {"Data": "a", "PartitionKey": "k"},
        {"Data": "b", "PartitionKey": ""},
    ]}));
    assert_eq!(msg, "records[1].PartitionKey is required");

    let msg = message(json!({"records": [{"Data": "a", "PartitionKey": "k", "ExplicitHashKey": "12x"}]}));
    assert_eq!(msg, "records[0].ExplicitHashKey can only contain digits");

    let msg = message(json!({"records": [{"PartitionKey": "k"}]}));
    assert_eq!(msg, "records[0].Data is required");
}

#[test]
fn empty_required_list_is_missing() {
    assert_eq!(message(json!({"records": []})), "records is required");
    assert_eq!(message(json!({})), "records is required");
}

#[test]
fn list_count_bounds() {
    let many: Vec<Value> = (0..501)
        .map(|i| json!({"Data": "d", "PartitionKey": format!("k{i}")}))
        .collect();
    assert_eq!(
        message(json!({ "records": many })),
        "Number of records must be between 1 and 500"
    );
}

#[test]
fn map_limits() {
    let ok = json!({"records": [{"Data": "a", "PartitionKey": "k"}]});
    let with_tags = |tags: Value| {
        let mut v = ok.clone();
        v["tags"] = tags;
        v
    };

    assert!(put().validate(with_tags(json!({"env": ""}))).is_ok());
    assert_eq!(
        message(with_tags(json!({"a": "1", "b": "2", "c": "3"}))),
        "Number of tags cannot exceed 2"
    );
    assert_eq!(
        message(with_tags(json!({"AWS:x": "1"}))),
        "tags key cannot start with \"aws:\""
    );
    assert_eq!(
        message(with_tags(json!({"env": "prod"}))),
        "tags value length must be between 0 and 3 characters"
    );
    assert!(matches!(
        put().validate(with_tags(json!({"env": 1}))).unwrap_err(),
        ToolError::InvalidType(_)
    ));
}

#[test]
fn timestamps_accept_rfc3339_or_seconds() {
    let base = |at: Value| json!({"records": [{"Data": "a", "PartitionKey": "k"}], "at": at});
    assert!(put().validate(base(json!("2024-01-01T00:00:00Z"))).is_ok());
    assert!(put().validate(base(json!(1_700_000_000))).is_ok());
    assert!(put().validate(base(json!(1.5))).is_ok());
    assert_eq!(
        message(base(json!("yesterday"))),
        "at must be an RFC 3339 timestamp"
    );
    assert!(matches!(
        put().validate(base(json!(true))).unwrap_err(),
        ToolError::InvalidType(_)
    ));
}

#[test]
fn conditional_rule_lists_triggers() {
    let msg = message(json!({
        "records": [{"Data": "a", "PartitionKey": "k"}],
        "iterator": "AT_SEQUENCE_NUMBER",
    }));
    assert_eq!(
        msg,
        "sequence is required when iterator is AT_SEQUENCE_NUMBER or AFTER_SEQUENCE_NUMBER"
    );
}

#[test]
fn non_object_input_is_a_type_error() {
    assert!(matches!(
        put().validate(json!([1, 2])).unwrap_err(),
        ToolError::InvalidType(_)
    ));
    assert_eq!(ArgSchema::new().validate(Value::Null).unwrap(), json!({}));
}

proptest! {
    #[test]
    fn integer_bounds_are_inclusive(n in -50i64..150) {
        let schema = ArgSchema::new().field(Field::integer("limit", 1, 100));
        let result = schema.validate(json!({ "limit": n }));
        prop_assert_eq!(result.is_ok(), (1..=100).contains(&n));
        if let Err(e) = result {
            prop_assert_eq!(e.message(), "limit must be between 1 and 100");
        }
    }

    #[test]
    fn string_length_counts_characters(s in "\\PC{0,12}") {
        let schema = ArgSchema::new().field(Field::string("name").len(1, 8));
        let len = s.chars().count();
        let result = schema.validate(json!({ "name": s }));
        prop_assert_eq!(result.is_ok(), (1..=8).contains(&len));
    }

    #[test]
    fn validation_failures_are_always_validation_tier(v in prop_oneof![
        Just(json!(null)),
        Just(json!(true)),
        any::<i64>().prop_map(|n| json!(n)),
        "\\PC{0,20}".prop_map(|s| json!(s)),
        Just(json!([])),
        Just(json!({})),
    ]) {
        if let Err(e) = put().validate(json!({ "records": v })) {
            prop_assert!(e.is_validation());
        }
    }
}
