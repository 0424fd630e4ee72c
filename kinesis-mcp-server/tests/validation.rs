mod common;

use common::{RecordingKinesis, call, call_err, registry_over};
use kinesis_mcp_server::ServerConfig;
use kinesis_tool::ToolRegistry;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn registry() -> ToolRegistry {
    let config = ServerConfig {
        testing: true,
        allow_destructive: true,
        ..ServerConfig::default()
    };
    registry_over(RecordingKinesis::new(), &config)
}

fn sid_cases() -> Vec<(&'static str, Value)> {
    vec![
        ("put_records", json!({"records": [{"Data": "x", "PartitionKey": "k"}]})),
        ("delete_stream", json!({})),
        ("describe_stream", json!({})),
        ("describe_stream_summary", json!({})),
        ("increase_stream_retention_period", json!({"retention_period_hours": 48})),
        ("decrease_stream_retention_period", json!({"retention_period_hours": 24})),
        (
            "get_shard_iterator",
            json!({"shard_id": "shardId-000000000000", "shard_iterator_type": "LATEST"}),
        ),
        ("update_shard_count", json!({"target_shard_count": 2})),
        ("add_tags_to_stream", json!({"tags": {"env": "prod"}})),
        ("remove_tags_from_stream", json!({"tag_keys": ["env"]})),
        ("list_tags_for_stream", json!({})),
        ("start_stream_encryption", json!({})),
        ("stop_stream_encryption", json!({})),
        ("enable_enhanced_monitoring", json!({"shard_level_metrics": ["ALL"]})),
        ("disable_enhanced_monitoring", json!({"shard_level_metrics": ["ALL"]})),
    ]
}

fn with(mut base: Value, key: &str, value: Value) -> Value {
    base.as_object_mut().unwrap().insert(key.to_string(), value);
    base
}

#[tokio::test]
async fn stream_identifier_is_required() {
    let registry = registry();
    for (tool, base) in sid_cases() {
        let err = call_err(&registry, tool, base).await;
        assert!(
            err.contains("Either stream_name or stream_arn must be provided"),
            "{tool}: {err}"
        );
    }
}

#[tokio::test]
async fn either_stream_identifier_is_enough() {
    let registry = registry();
    for (tool, base) in sid_cases() {
        for (key, value) in [
            ("stream_name", "orders"),
            ("stream_arn", "arn:aws:kinesis:us-west-2:123456789012:stream/orders"),
        ] {
            let result = call(&registry, tool, with(base.clone(), key, json!(value))).await;
            assert!(result.is_ok(), "{tool} with {key}: {result:?}");
        }
    }
}

#[tokio::test]
async fn string_length_bounds() {
    let registry = registry();
    let cases: &[(&str, Value, &str, usize)] = &[
        ("describe_stream_summary", json!({}), "stream_name", 128),
        ("describe_stream_summary", json!({}), "stream_arn", 2048),
        (
            "get_shard_iterator",
            json!({"stream_name": "s", "shard_iterator_type": "LATEST"}),
            "shard_id",
            128,
        ),
        ("get_records", json!({}), "shard_iterator", 512),
    ];
    for (tool, base, field, max) in cases {
        let at_max = with(base.clone(), field, json!("a".repeat(*max)));
        assert!(
            call(&registry, tool, at_max).await.is_ok(),
            "{tool}.{field} at {max}"
        );

        let over = with(base.clone(), field, json!("a".repeat(max + 1)));
        let err = call_err(&registry, tool, over).await;
        assert!(
            err.contains(&format!("{field} length must be between 1 and {max} characters")),
            "{tool}.{field}: {err}"
        );
    }
}

#[tokio::test]
async fn tag_key_and_value_bounds() {
    let registry = registry();
    let add = |tags: Value| json!({"stream_name": "orders", "tags": tags});

    let mut ok = Map::new();
    ok.insert("k".repeat(128), json!(""));
    ok.insert("v".to_string(), json!("v".repeat(256)));
    assert!(call(&registry, "add_tags_to_stream", add(Value::Object(ok))).await.is_ok());

    let err = call_err(&registry, "add_tags_to_stream", add(json!({("k".repeat(129)): "v"}))).await;
    assert!(err.contains("tags key length must be between 1 and 128"), "{err}");

    let err = call_err(&registry, "add_tags_to_stream", add(json!({"k": "v".repeat(257)}))).await;
    assert!(err.contains("tags value length must be between 0 and 256"), "{err}");
}

fn tags(n: usize) -> Value {
    Value::Object((0..n).map(|i| (format!("key{i}"), json!("v"))).collect())
}

#[tokio::test]
async fn tag_map_size_limit() {
    let registry = registry();
    for tool in ["add_tags_to_stream", "create_stream"] {
        let ok = json!({"stream_name": "orders", "tags": tags(50)});
        assert!(call(&registry, tool, ok).await.is_ok(), "{tool}");

        let err = call_err(&registry, tool, json!({"stream_name": "orders", "tags": tags(51)})).await;
        assert!(err.contains("Number of tags cannot exceed 50"), "{tool}: {err}");
    }
    let err = call_err(
        &registry,
        "tag_resource",
        json!({"resource_arn": "arn:aws:kinesis:us-west-2:1:stream/s", "tags": tags(51)}),
    )
    .await;
    assert!(err.contains("Number of tags cannot exceed 50"), "{err}");
}

fn records(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"Data": format!("payload {i}"), "PartitionKey": format!("pk-{i}")}))
            .collect(),
    )
}

#[tokio::test]
async fn record_batch_size() {
    let registry = registry();
    for n in [1, 500] {
        let input = json!({"stream_name": "orders", "records": records(n)});
        assert!(call(&registry, "put_records", input).await.is_ok(), "{n} records");
    }

    let err = call_err(&registry, "put_records", json!({"stream_name": "orders", "records": []})).await;
    assert!(err.contains("records is required"), "{err}");

    let err = call_err(
        &registry,
        "put_records",
        json!({"stream_name": "orders", "records": records(501)}),
    )
    .await;
    assert!(err.contains("Number of records must be between 1 and 500"), "{err}");
}

#[tokio::test]
async fn malformed_records_name_the_entry() {
    let registry = registry();
    let err = call_err(
        &registry,
        "put_records",
        json!({"stream_name": "orders", "records": [
            {"Data": "a", "PartitionKey": "k"},
            {"Data": "b", "PartitionKey": "k", "ExplicitHashKey": "12ab"}
        ]}),
    )
    .await;
    assert!(err.contains("records[1].ExplicitHashKey can only contain digits"), "{err}");

    let err = call_err(
        &registry,
        "put_records",
        json!({"stream_name": "orders", "records": [{"Data": "a"}]}),
    )
    .await;
    assert!(err.contains("records[0].PartitionKey is required"), "{err}");
}

#[tokio::test]
async fn iterator_type_conditional_requirements() {
    let registry = registry();
    let base = |kind: &str| {
        json!({"stream_name": "orders", "shard_id": "shardId-000000000000", "shard_iterator_type": kind})
    };

    for kind in ["AT_SEQUENCE_NUMBER", "AFTER_SEQUENCE_NUMBER"] {
        let err = call_err(&registry, "get_shard_iterator", base(kind)).await;
        assert!(
            err.contains(
                "starting_sequence_number is required when shard_iterator_type is AT_SEQUENCE_NUMBER or AFTER_SEQUENCE_NUMBER"
            ),
            "{kind}: {err}"
        );
        let with_seq = with(base(kind), "starting_sequence_number", json!("49590338271490256608559692538361571095921575989136588898"));
        assert!(call(&registry, "get_shard_iterator", with_seq).await.is_ok());
    }

    let err = call_err(&registry, "get_shard_iterator", base("AT_TIMESTAMP")).await;
    assert!(err.contains("timestamp is required when shard_iterator_type is AT_TIMESTAMP"), "{err}");
    let stamped = with(base("AT_TIMESTAMP"), "timestamp", json!("2024-05-01T12:00:00Z"));
    assert!(call(&registry, "get_shard_iterator", stamped).await.is_ok());

    for kind in ["TRIM_HORIZON", "LATEST"] {
        assert!(call(&registry, "get_shard_iterator", base(kind)).await.is_ok(), "{kind}");
    }
}

#[tokio::test]
async fn invalid_iterator_type_names_the_allowed_set() {
    let registry = registry();
    let err = call_err(
        &registry,
        "get_shard_iterator",
        json!({"stream_name": "orders", "shard_id": "shardId-000000000000", "shard_iterator_type": "OLDEST"}),
    )
    .await;
    assert!(
        err.contains(
            "shard_iterator_type must be one of [AT_SEQUENCE_NUMBER, AFTER_SEQUENCE_NUMBER, TRIM_HORIZON, LATEST, AT_TIMESTAMP]"
        ),
        "{err}"
    );
}

#[tokio::test]
async fn wrong_primitive_types() {
    let registry = registry();
    let err = call_err(&registry, "describe_stream_summary", json!({"stream_name": 7})).await;
    assert!(err.starts_with("invalid argument: stream_name must be a string"), "{err}");

    let err = call_err(&registry, "list_streams", json!({"limit": "ten"})).await;
    assert!(err.contains("limit must be an integer"), "{err}");

    let err = call_err(&registry, "add_tags_to_stream", json!({"stream_name": "s", "tags": ["a"]})).await;
    assert!(err.contains("tags must be a dictionary"), "{err}");

    let err = call_err(&registry, "put_records", json!({"stream_name": "s", "records": "a"})).await;
    assert!(err.contains("records must be a list"), "{err}");
}

#[tokio::test]
async fn create_stream_name_rules() {
    let registry = registry();
    let err = call_err(&registry, "create_stream", json!({"stream_name": "has space"})).await;
    assert!(
        err.contains("stream_name can only contain alphanumeric characters, hyphens, underscores, and periods"),
        "{err}"
    );

    let err = call_err(&registry, "create_stream", json!({"stream_name": "AWS:internal"})).await;
    assert!(err.contains("stream_name cannot start with \"aws:\""), "{err}");

    let err = call_err(
        &registry,
        "create_stream",
        json!({"stream_name": "s", "stream_mode_details": {"StreamMode": "BURST"}}),
    )
    .await;
    assert!(
        err.contains("stream_mode_details.StreamMode must be one of [ON_DEMAND, PROVISIONED]"),
        "{err}"
    );

    let err = call_err(&registry, "create_stream", json!({"stream_name": "s", "shard_count": 501})).await;
    assert!(err.contains("shard_count must be between 1 and 500"), "{err}");
}

#[tokio::test]
async fn retention_bounds() {
    let registry = registry();
    for hours in [23, 8761] {
        let err = call_err(
            &registry,
            "increase_stream_retention_period",
            json!({"stream_name": "s", "retention_period_hours": hours}),
        )
        .await;
        assert!(
            err.contains("retention_period_hours must be between 24 and 8760"),
            "{hours}: {err}"
        );
    }
}

#[tokio::test]
async fn monitoring_metrics() {
    let registry = registry();
    let err = call_err(
        &registry,
        "enable_enhanced_monitoring",
        json!({"stream_name": "s", "shard_level_metrics": ["IncomingBytes", "Latency"]}),
    )
    .await;
    assert!(err.contains("shard_level_metrics[1] must be one of"), "{err}");

    let err = call_err(
        &registry,
        "enable_enhanced_monitoring",
        json!({"stream_name": "s", "shard_level_metrics": []}),
    )
    .await;
    assert!(err.contains("shard_level_metrics is required"), "{err}");
}

#[tokio::test]
async fn consumer_identity_rules() {
    let registry = registry();
    let err = call_err(&registry, "describe_stream_consumer", json!({})).await;
    assert!(err.contains("Either consumer_arn or consumer_name must be provided"), "{err}");

    let err = call_err(&registry, "describe_stream_consumer", json!({"consumer_name": "c"})).await;
    assert!(err.contains("stream_arn is required when consumer_name is provided"), "{err}");

    let by_arn = json!({"consumer_arn": "arn:aws:kinesis:us-west-2:1:stream/s/consumer/c:1"});
    assert!(call(&registry, "describe_stream_consumer", by_arn).await.is_ok());

    let arn_and_name = json!({
        "consumer_arn": "arn:aws:kinesis:us-west-2:1:stream/s/consumer/c:1",
        "consumer_name": "c"
    });
    assert!(call(&registry, "describe_stream_consumer", arn_and_name).await.is_ok());
}

#[tokio::test]
async fn policy_must_be_a_json_object() {
    let registry = registry();
    let arn = "arn:aws:kinesis:us-west-2:123456789012:stream/orders";
    let err = call_err(
        &registry,
        "put_resource_policy",
        json!({"resource_arn": arn, "policy": "not json"}),
    )
    .await;
    assert!(err.contains("policy must be valid JSON"), "{err}");

    let err = call_err(
        &registry,
        "put_resource_policy",
        json!({"resource_arn": arn, "policy": "[1, 2]"}),
    )
    .await;
    assert!(err.contains("policy must be a JSON object"), "{err}");
}

#[tokio::test]
async fn unknown_arguments_are_rejected() {
    let registry = registry();
    let err = call_err(&registry, "list_streams", json!({"StreamName": "orders"})).await;
    assert!(err.contains("unexpected argument: StreamName"), "{err}");
}

#[tokio::test]
async fn region_name_bounds() {
    let registry = registry();
    let err = call_err(&registry, "describe_limits", json!({"region_name": ""})).await;
    assert!(err.contains("region_name length must be between 1 and 64 characters"), "{err}");
}

proptest! {
    #[test]
    fn stream_name_length_boundary(len in 1usize..=200) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let registry = registry();
        let result = rt.block_on(call(
            &registry,
            "describe_stream_summary",
            json!({"stream_name": "s".repeat(len)}),
        ));
        prop_assert_eq!(result.is_ok(), len <= 128);
        if let Err(e) = result {
            prop_assert!(e.is_validation());
        }
    }

    #[test]
    fn get_records_limit_boundary(limit in -5i64..=10_010) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let registry = registry();
        let result = rt.block_on(call(
            &registry,
            "get_records",
            json!({"shard_iterator": "AAAA", "limit": limit}),
        ));
        prop_assert_eq!(result.is_ok(), (1..=10_000).contains(&limit));
    }
}
