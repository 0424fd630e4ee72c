//! SDK output types to Kinesis wire JSON.
//!
//! Keys are the PascalCase wire names, blobs are base64, timestamps are epoch
//! seconds, and absent members are omitted.

use aws_sdk_kinesis::primitives::{Blob, DateTime};
use aws_sdk_kinesis::types::{
    ChildShard, Consumer, ConsumerDescription, ConsumerStatus, EncryptionType, EnhancedMetrics,
    HashKeyRange, MetricsName, PutRecordsResultEntry, Record, SequenceNumberRange, Shard,
    StreamDescription, StreamDescriptionSummary, StreamMode, StreamModeDetails, StreamStatus,
    StreamSummary, Tag,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};

/// Conversion into wire JSON.
///
/// Implemented for both `T` and `Option<T>` so SDK accessors convert the same
/// way whether the member is modelled as required or optional.
pub(crate) trait ToJson {
    fn to_json(&self) -> Value;
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToJson::to_json)
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(ToJson::to_json).collect())
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl ToJson for str {
    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        self.as_str().to_json()
    }
}

impl ToJson for i32 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl ToJson for i64 {
    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToJson for DateTime {
    fn to_json(&self) -> Value {
        Value::from(self.as_secs_f64())
    }
}

impl ToJson for Blob {
    fn to_json(&self) -> Value {
        Value::String(STANDARD.encode(self.as_ref()))
    }
}

macro_rules! enum_to_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToJson for $ty {
                fn to_json(&self) -> Value {
                    Value::String(self.as_str().to_string())
                }
            }
        )*
    };
}

enum_to_json!(ConsumerStatus, EncryptionType, MetricsName, StreamMode, StreamStatus);

/// Build a JSON object from `(key, value)` pairs, dropping nulls.
pub(crate) fn object<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    Value::Object(
        pairs
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.to_string(), v))
            .collect::<Map<String, Value>>(),
    )
}

impl ToJson for StreamModeDetails {
    fn to_json(&self) -> Value {
        object([("StreamMode", self.stream_mode().to_json())])
    }
}

impl ToJson for EnhancedMetrics {
    fn to_json(&self) -> Value {
        object([("ShardLevelMetrics", self.shard_level_metrics().to_json())])
    }
}

impl ToJson for HashKeyRange {
    fn to_json(&self) -> Value {
        object([
            ("StartingHashKey", self.starting_hash_key().to_json()),
            ("EndingHashKey", self.ending_hash_key().to_json()),
        ])
    }
}

impl ToJson for SequenceNumberRange {
    fn to_json(&self) -> Value {
        object([
            ("StartingSequenceNumber", self.starting_sequence_number().to_json()),
            ("EndingSequenceNumber", self.ending_sequence_number().to_json()),
        ])
    }
}

impl ToJson for Shard {
    fn to_json(&self) -> Value {
        object([
            ("ShardId", self.shard_id().to_json()),
            ("ParentShardId", self.parent_shard_id().to_json()),
            ("AdjacentParentShardId", self.adjacent_parent_shard_id().to_json()),
            ("HashKeyRange", self.hash_key_range().to_json()),
            ("SequenceNumberRange", self.sequence_number_range().to_json()),
        ])
    }
}

impl ToJson for ChildShard {
    fn to_json(&self) -> Value {
        object([
            ("ShardId", self.shard_id().to_json()),
            ("ParentShards", self.parent_shards().to_json()),
            ("HashKeyRange", self.hash_key_range().to_json()),
        ])
    }
}

impl ToJson for Record {
    fn to_json(&self) -> Value {
        object([
            ("SequenceNumber", self.sequence_number().to_json()),
            (
                "ApproximateArrivalTimestamp",
                self.approximate_arrival_timestamp().to_json(),
            ),
            ("Data", self.data().to_json()),
            ("PartitionKey", self.partition_key().to_json()),
            ("EncryptionType", self.encryption_type().to_json()),
        ])
    }
}

impl ToJson for PutRecordsResultEntry {
    fn to_json(&self) -> Value {
        object([
            ("SequenceNumber", self.sequence_number().to_json()),
            ("ShardId", self.shard_id().to_json()),
            ("ErrorCode", self.error_code().to_json()),
            ("ErrorMessage", self.error_message().to_json()),
        ])
    }
}

impl ToJson for StreamSummary {
    fn to_json(&self) -> Value {
        object([
            ("StreamName", self.stream_name().to_json()),
            ("StreamARN", self.stream_arn().to_json()),
            ("StreamStatus", self.stream_status().to_json()),
            ("StreamModeDetails", self.stream_mode_details().to_json()),
            (
                "StreamCreationTimestamp",
                self.stream_creation_timestamp().to_json(),
            ),
        ])
    }
}

impl ToJson for StreamDescription {
    fn to_json(&self) -> Value {
        object([
            ("StreamName", self.stream_name().to_json()),
            ("StreamARN", self.stream_arn().to_json()),
            ("StreamStatus", self.stream_status().to_json()),
            ("StreamModeDetails", self.stream_mode_details().to_json()),
            ("Shards", self.shards().to_json()),
            ("HasMoreShards", self.has_more_shards().to_json()),
            ("RetentionPeriodHours", self.retention_period_hours().to_json()),
            (
                "StreamCreationTimestamp",
                self.stream_creation_timestamp().to_json(),
            ),
            ("EnhancedMonitoring", self.enhanced_monitoring().to_json()),
            ("EncryptionType", self.encryption_type().to_json()),
            ("KeyId", self.key_id().to_json()),
        ])
    }
}

impl ToJson for StreamDescriptionSummary {
    fn to_json(&self) -> Value {
        object([
            ("StreamName", self.stream_name().to_json()),
            ("StreamARN", self.stream_arn().to_json()),
            ("StreamStatus", self.stream_status().to_json()),
            ("StreamModeDetails", self.stream_mode_details().to_json()),
            ("RetentionPeriodHours", self.retention_period_hours().to_json()),
            (
                "StreamCreationTimestamp",
                self.stream_creation_timestamp().to_json(),
            ),
            ("EnhancedMonitoring", self.enhanced_monitoring().to_json()),
            ("EncryptionType", self.encryption_type().to_json()),
            ("KeyId", self.key_id().to_json()),
            ("OpenShardCount", self.open_shard_count().to_json()),
            ("ConsumerCount", self.consumer_count().to_json()),
        ])
    }
}

impl ToJson for Tag {
    fn to_json(&self) -> Value {
        object([
            ("Key", self.key().to_json()),
            ("Value", self.value().to_json()),
        ])
    }
}

impl ToJson for Consumer {
    fn to_json(&self) -> Value {
        object([
            ("ConsumerName", self.consumer_name().to_json()),
            ("ConsumerARN", self.consumer_arn().to_json()),
            ("ConsumerStatus", self.consumer_status().to_json()),
            (
                "ConsumerCreationTimestamp",
                self.consumer_creation_timestamp().to_json(),
            ),
        ])
    }
}

impl ToJson for ConsumerDescription {
    fn to_json(&self) -> Value {
        object([
            ("ConsumerName", self.consumer_name().to_json()),
            ("ConsumerARN", self.consumer_arn().to_json()),
            ("ConsumerStatus", self.consumer_status().to_json()),
            (
                "ConsumerCreationTimestamp",
                self.consumer_creation_timestamp().to_json(),
            ),
            ("StreamARN", self.stream_arn().to_json()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blobs_are_base64() {
        assert_eq!(Blob::new(b"hello".to_vec()).to_json(), json!("aGVsbG8="));
    }

    #[test]
    fn timestamps_are_epoch_seconds() {
        assert_eq!(DateTime::from_secs(1_700_000_000).to_json(), json!(1_700_000_000.0));
    }

    #[test]
    fn object_drops_absent_members() {
        let none: Option<&str> = None;
        let v = object([("A", Some("x").to_json()), ("B", none.to_json())]);
        assert_eq!(v, json!({"A": "x"}));
    }

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(StreamMode::OnDemand.to_json(), json!("ON_DEMAND"));
        assert_eq!(MetricsName::All.to_json(), json!("ALL"));
    }
}
