#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kinesis_mcp_server::{
    KinesisApi, KinesisError, KinesisService, Operation, Params, ServerConfig, build_registry,
};
use kinesis_tool::ToolRegistry;
use kinesis_types::{ToolContext, ToolError, ToolOutput};
use serde_json::{Value, json};

/// One forwarded call.
#[derive(Debug, Clone)]
pub struct Call {
    pub region: String,
    pub operation: Operation,
    pub params: Params,
}

/// Records every call and answers with canned responses.
#[derive(Default)]
pub struct RecordingKinesis {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<BTreeMap<&'static str, Value>>,
    fail: bool,
}

impl RecordingKinesis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn respond(&self, operation: Operation, response: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(operation.as_str(), response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("no call was forwarded")
    }
}

#[async_trait]
impl KinesisApi for RecordingKinesis {
    async fn invoke(
        &self,
        region: &str,
        operation: Operation,
        params: Params,
    ) -> Result<Value, KinesisError> {
        self.calls.lock().unwrap().push(Call {
            region: region.to_string(),
            operation,
            params,
        });
        if self.fail {
            return Err(KinesisError::Service {
                operation,
                message: "ResourceNotFoundException: Stream missing not found".to_string(),
            });
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(operation.as_str())
            .cloned()
            .unwrap_or_else(|| json!({"ok": true})))
    }
}

#[derive(Debug, Clone)]
struct FakeStream {
    arn: String,
    mode: String,
    shards: i64,
    retention: i64,
    tags: BTreeMap<String, String>,
    records: Vec<Value>,
}

/// In-memory stand-in for a small slice of Kinesis.
#[derive(Default)]
pub struct FakeKinesis {
    streams: Mutex<BTreeMap<String, FakeStream>>,
}

impl FakeKinesis {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_count(&self, name: &str) -> usize {
        self.streams
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, |s| s.records.len())
    }

    fn not_found(operation: Operation, name: &str) -> KinesisError {
        KinesisError::Service {
            operation,
            message: format!("ResourceNotFoundException: Stream {name} under account 123456789012 not found."),
        }
    }

    fn name_of(params: &Params) -> String {
        params.string("StreamName").unwrap_or_else(|| {
            params
                .str("StreamARN")
                .and_then(|arn| arn.rsplit('/').next())
                .unwrap_or_default()
                .to_string()
        })
    }
}

#[async_trait]
impl KinesisApi for FakeKinesis {
    async fn invoke(
        &self,
        region: &str,
        operation: Operation,
        params: Params,
    ) -> Result<Value, KinesisError> {
        let mut streams = self.streams.lock().unwrap();
        let name = Self::name_of(&params);
        match operation {
            Operation::CreateStream => {
                if streams.contains_key(&name) {
                    return Err(KinesisError::Service {
                        operation,
                        message: format!("ResourceInUseException: Stream {name} already exists"),
                    });
                }
                let mode = params
                    .get("StreamModeDetails")
                    .and_then(|d| d.get("StreamMode"))
                    .and_then(Value::as_str)
                    .unwrap_or("ON_DEMAND")
                    .to_string();
                streams.insert(
                    name.clone(),
                    FakeStream {
                        arn: format!("arn:aws:kinesis:{region}:123456789012:stream/{name}"),
                        mode,
                        shards: params.get("ShardCount").and_then(Value::as_i64).unwrap_or(4),
                        retention: 24,
                        tags: params.string_map("Tags").unwrap_or_default().into_iter().collect(),
                        records: Vec::new(),
                    },
                );
                Ok(json!({}))
            }
            Operation::DescribeStreamSummary => {
                let s = streams
                    .get(&name)
                    .ok_or_else(|| Self::not_found(operation, &name))?;
                Ok(json!({
                    "StreamDescriptionSummary": {
                        "StreamName": name,
                        "StreamARN": s.arn,
                        "StreamStatus": "ACTIVE",
                        "StreamModeDetails": {"StreamMode": s.mode},
                        "RetentionPeriodHours": s.retention,
                        "OpenShardCount": s.shards,
                        "EncryptionType": "NONE",
                        "ConsumerCount": 0
                    }
                }))
            }
            Operation::PutRecords => {
                let s = streams
                    .get_mut(&name)
                    .ok_or_else(|| Self::not_found(operation, &name))?;
                let records = params
                    .get("Records")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let entries: Vec<Value> = records
                    .iter()
                    .map(|_| {
                        s.records.push(Value::Null);
                        json!({
                            "SequenceNumber": format!("{:056}", s.records.len()),
                            "ShardId": "shardId-000000000000"
                        })
                    })
                    .collect();
                Ok(json!({"FailedRecordCount": 0, "Records": entries}))
            }
            Operation::ListStreams => Ok(json!({
                "StreamNames": streams.keys().collect::<Vec<_>>(),
                "HasMoreStreams": false
            })),
            Operation::DeleteStream => streams
                .remove(&name)
                .map(|_| json!({}))
                .ok_or_else(|| Self::not_found(operation, &name)),
            Operation::IncreaseStreamRetentionPeriod | Operation::DecreaseStreamRetentionPeriod => {
                let s = streams
                    .get_mut(&name)
                    .ok_or_else(|| Self::not_found(operation, &name))?;
                s.retention = params.get("RetentionPeriodHours").and_then(Value::as_i64).unwrap_or(s.retention);
                Ok(json!({}))
            }
            Operation::AddTagsToStream => {
                let s = streams
                    .get_mut(&name)
                    .ok_or_else(|| Self::not_found(operation, &name))?;
                s.tags.extend(params.string_map("Tags").unwrap_or_default());
                Ok(json!({}))
            }
            Operation::ListTagsForStream => {
                let s = streams
                    .get(&name)
                    .ok_or_else(|| Self::not_found(operation, &name))?;
                let tags: Vec<Value> = s
                    .tags
                    .iter()
                    .map(|(k, v)| json!({"Key": k, "Value": v}))
                    .collect();
                Ok(json!({"Tags": tags, "HasMoreTags": false}))
            }
            other => Err(KinesisError::Request(format!("{other} is not simulated"))),
        }
    }
}

pub fn config() -> ServerConfig {
    ServerConfig::default()
}

pub fn registry_over(api: Arc<dyn KinesisApi>, config: &ServerConfig) -> ToolRegistry {
    build_registry(KinesisService::new(api, config.region.clone()), config)
}

pub async fn call(registry: &ToolRegistry, tool: &str, input: Value) -> Result<ToolOutput, ToolError> {
    registry.execute(tool, input, &ToolContext::new("test")).await
}

/// Structured result of a successful call.
pub async fn call_ok(registry: &ToolRegistry, tool: &str, input: Value) -> Value {
    let out = call(registry, tool, input).await.unwrap();
    let text = out.text_content();
    out.structured_content
        .unwrap_or_else(|| panic!("{tool} returned no structured content: {text}"))
}

/// Message of a failed call.
pub async fn call_err(registry: &ToolRegistry, tool: &str, input: Value) -> String {
    match call(registry, tool, input).await {
        Ok(out) => panic!("{tool} unexpectedly succeeded: {}", out.text_content()),
        Err(e) => e.to_string(),
    }
}
