//! The seam between the tools and Amazon Kinesis.
//!
//! Tools assemble a [`Params`] map using the Kinesis wire names and hand it to
//! a [`KinesisService`] together with the [`Operation`] to run. The service
//! resolves the target region and forwards the call to a [`KinesisApi`]
//! backend: [`AwsKinesis`] in production, in-memory doubles in tests.

mod aws;
mod convert;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kinesis_types::ToolError;
use serde::Serialize;
use serde_json::{Map, Value};

pub use aws::AwsKinesis;

/// Kinesis Data Streams API operations reachable through the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PutRecords,
    GetRecords,
    CreateStream,
    DeleteStream,
    ListStreams,
    DescribeStream,
    DescribeStreamSummary,
    DescribeLimits,
    UpdateStreamMode,
    IncreaseStreamRetentionPeriod,
    DecreaseStreamRetentionPeriod,
    ListShards,
    GetShardIterator,
    UpdateShardCount,
    AddTagsToStream,
    RemoveTagsFromStream,
    ListTagsForStream,
    TagResource,
    UntagResource,
    ListTagsForResource,
    StartStreamEncryption,
    StopStreamEncryption,
    EnableEnhancedMonitoring,
    DisableEnhancedMonitoring,
    GetResourcePolicy,
    PutResourcePolicy,
    DeleteResourcePolicy,
    RegisterStreamConsumer,
    DescribeStreamConsumer,
    ListStreamConsumers,
    DeregisterStreamConsumer,
}

impl Operation {
    /// The API action name, e.g. `"PutRecords"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PutRecords => "PutRecords",
            Self::GetRecords => "GetRecords",
            Self::CreateStream => "CreateStream",
            Self::DeleteStream => "DeleteStream",
            Self::ListStreams => "ListStreams",
            Self::DescribeStream => "DescribeStream",
            Self::DescribeStreamSummary => "DescribeStreamSummary",
            Self::DescribeLimits => "DescribeLimits",
            Self::UpdateStreamMode => "UpdateStreamMode",
            Self::IncreaseStreamRetentionPeriod => "IncreaseStreamRetentionPeriod",
            Self::DecreaseStreamRetentionPeriod => "DecreaseStreamRetentionPeriod",
            Self::ListShards => "ListShards",
            Self::GetShardIterator => "GetShardIterator",
            Self::UpdateShardCount => "UpdateShardCount",
            Self::AddTagsToStream => "AddTagsToStream",
            Self::RemoveTagsFromStream => "RemoveTagsFromStream",
            Self::ListTagsForStream => "ListTagsForStream",
            Self::TagResource => "TagResource",
            Self::UntagResource => "UntagResource",
            Self::ListTagsForResource => "ListTagsForResource",
            Self::StartStreamEncryption => "StartStreamEncryption",
            Self::StopStreamEncryption => "StopStreamEncryption",
            Self::EnableEnhancedMonitoring => "EnableEnhancedMonitoring",
            Self::DisableEnhancedMonitoring => "DisableEnhancedMonitoring",
            Self::GetResourcePolicy => "GetResourcePolicy",
            Self::PutResourcePolicy => "PutResourcePolicy",
            Self::DeleteResourcePolicy => "DeleteResourcePolicy",
            Self::RegisterStreamConsumer => "RegisterStreamConsumer",
            Self::DescribeStreamConsumer => "DescribeStreamConsumer",
            Self::ListStreamConsumers => "ListStreamConsumers",
            Self::DeregisterStreamConsumer => "DeregisterStreamConsumer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from reaching Kinesis.
#[derive(Debug, thiserror::Error)]
pub enum KinesisError {
    /// The service (or the SDK on its way there) reported a failure.
    #[error("{operation} failed: {message}")]
    Service {
        /// The operation that failed.
        operation: Operation,
        /// The SDK error with its full source chain.
        message: String,
    },
    /// The forwarded parameters could not be turned into an SDK request.
    #[error("invalid request: {0}")]
    Request(String),
    /// The SDK client could not be configured.
    #[error("client configuration failed: {0}")]
    Config(String),
}

impl From<KinesisError> for ToolError {
    fn from(e: KinesisError) -> Self {
        ToolError::ExecutionFailed(Box::new(e))
    }
}

/// Request parameters keyed by Kinesis wire names (`StreamName`, `ShardId`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// An empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set `key` only when `value` is present.
    #[must_use]
    pub fn set_opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// String value for `key`.
    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Owned string value for `key`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        self.str(key).map(str::to_string)
    }

    /// String value for `key`, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`KinesisError::Request`] if `key` is missing or not a string.
    pub fn required_str(&self, key: &str) -> Result<&str, KinesisError> {
        self.str(key)
            .ok_or_else(|| KinesisError::Request(format!("{key} is missing")))
    }

    /// Integer value for `key`, if it fits in an `i32`.
    #[must_use]
    pub fn i32(&self, key: &str) -> Option<i32> {
        self.get(key)
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
    }

    /// Boolean value for `key`.
    #[must_use]
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// List-of-strings value for `key`.
    #[must_use]
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// String-to-string map value for `key`.
    #[must_use]
    pub fn string_map(&self, key: &str) -> Option<HashMap<String, String>> {
        self.get(key)?
            .as_object()?
            .iter()
            .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect()
    }

    /// Timestamp value for `key` as seconds since the Unix epoch.
    ///
    /// Accepts a number of seconds or an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns [`KinesisError::Request`] if the value is neither.
    pub fn epoch_seconds(&self, key: &str) -> Result<Option<f64>, KinesisError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.timestamp_millis() as f64 / 1000.0))
                .map_err(|e| KinesisError::Request(format!("{key} is not a timestamp: {e}"))),
            _ => Err(KinesisError::Request(format!("{key} is not a timestamp"))),
        }
    }

    /// The underlying JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl PartialEq<Value> for Params {
    fn eq(&self, other: &Value) -> bool {
        other.as_object() == Some(&self.0)
    }
}

/// A backend able to run Kinesis operations.
///
/// Responses use the Kinesis JSON wire shape: PascalCase keys, blobs as
/// base64 strings, timestamps as epoch seconds.
#[async_trait]
pub trait KinesisApi: Send + Sync {
    /// Run `operation` against `region` with the given parameters.
    async fn invoke(
        &self,
        region: &str,
        operation: Operation,
        params: Params,
    ) -> Result<Value, KinesisError>;
}

/// Shared handle the tools use to reach Kinesis.
#[derive(Clone)]
pub struct KinesisService {
    api: Arc<dyn KinesisApi>,
    default_region: String,
}

impl KinesisService {
    /// Wrap a backend. `default_region` is used when a call names no region.
    pub fn new(api: Arc<dyn KinesisApi>, default_region: impl Into<String>) -> Self {
        Self {
            api,
            default_region: default_region.into(),
        }
    }

    /// The region a call runs against.
    #[must_use]
    pub fn resolve_region<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit.unwrap_or(&self.default_region)
    }

    /// Run `operation`, resolving the region from `region_name` or the default.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`KinesisError`].
    pub async fn call(
        &self,
        region_name: Option<&str>,
        operation: Operation,
        params: Params,
    ) -> Result<Value, KinesisError> {
        let region = self.resolve_region(region_name);
        tracing::debug!(%operation, region, "forwarding to kinesis");
        self.api.invoke(region, operation, params).await
    }
}

impl fmt::Debug for KinesisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinesisService")
            .field("default_region", &self.default_region)
            .finish_non_exhaustive()
    }
}
