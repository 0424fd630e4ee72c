//! [`KinesisApi`] backed by the AWS SDK for Rust.

use async_trait::async_trait;
use aws_config::{AppName, BehaviorVersion, Region};
use aws_sdk_kinesis::Client;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::{Blob, DateTime};
use aws_sdk_kinesis::types::{
    EncryptionType, MetricsName, PutRecordsRequestEntry, ScalingType, ShardIteratorType,
    StreamMode, StreamModeDetails,
};
use serde_json::{Value, json};

use super::convert::{ToJson, object};
use super::{KinesisApi, KinesisError, Operation, Params};

/// Application name appended to the SDK user agent.
pub const APP_NAME: &str = "kinesis-mcp-server";

/// Kinesis backend that talks to AWS.
///
/// A fresh SDK configuration and client are built for every call, so
/// credentials rotated in the environment or profile take effect without a
/// restart. Credentials come from the default provider chain.
#[derive(Debug, Clone, Default)]
pub struct AwsKinesis;

impl AwsKinesis {
    /// Create the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn client(&self, region: &str) -> Result<Client, KinesisError> {
        let app_name = AppName::new(APP_NAME).map_err(|e| KinesisError::Config(e.to_string()))?;
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .app_name(app_name)
            .load()
            .await;
        Ok(Client::new(&config))
    }
}

#[async_trait]
impl KinesisApi for AwsKinesis {
    async fn invoke(
        &self,
        region: &str,
        operation: Operation,
        params: Params,
    ) -> Result<Value, KinesisError> {
        let client = self.client(region).await?;
        dispatch(&client, operation, &params).await
    }
}

fn failed<E: std::error::Error>(operation: Operation) -> impl FnOnce(E) -> KinesisError {
    move |err| KinesisError::Service {
        operation,
        message: DisplayErrorContext(err).to_string(),
    }
}

fn invalid(e: impl std::fmt::Display) -> KinesisError {
    KinesisError::Request(e.to_string())
}

fn records(params: &Params) -> Result<Vec<PutRecordsRequestEntry>, KinesisError> {
    let items = params
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("Records is missing"))?;
    items
        .iter()
        .map(|item| {
            let data = item
                .get("Data")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("record Data is missing"))?;
            let key = item
                .get("PartitionKey")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("record PartitionKey is missing"))?;
            PutRecordsRequestEntry::builder()
                .data(Blob::new(data.as_bytes().to_vec()))
                .partition_key(key)
                .set_explicit_hash_key(
                    item.get("ExplicitHashKey")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                )
                .build()
                .map_err(invalid)
        })
        .collect()
}

fn stream_mode_details(params: &Params) -> Result<Option<StreamModeDetails>, KinesisError> {
    let Some(mode) = params
        .get("StreamModeDetails")
        .and_then(|d| d.get("StreamMode"))
        .and_then(Value::as_str)
    else {
        return Ok(None);
    };
    StreamModeDetails::builder()
        .stream_mode(StreamMode::from(mode))
        .build()
        .map(Some)
        .map_err(invalid)
}

fn timestamp(params: &Params, key: &str) -> Result<Option<DateTime>, KinesisError> {
    Ok(params.epoch_seconds(key)?.map(DateTime::from_secs_f64))
}

fn metrics(params: &Params) -> Option<Vec<MetricsName>> {
    params
        .strings("ShardLevelMetrics")
        .map(|names| names.iter().map(|n| MetricsName::from(n.as_str())).collect())
}

async fn dispatch(
    client: &Client,
    operation: Operation,
    params: &Params,
) -> Result<Value, KinesisError> {
    use Operation as Op;

    let value = match operation {
        Op::PutRecords => {
            let out = client
                .put_records()
                .set_records(Some(records(params)?))
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("FailedRecordCount", out.failed_record_count().to_json()),
                ("Records", out.records().to_json()),
                ("EncryptionType", out.encryption_type().to_json()),
            ])
        }
        Op::GetRecords => {
            let out = client
                .get_records()
                .shard_iterator(params.required_str("ShardIterator")?)
                .set_limit(params.i32("Limit"))
                .set_stream_arn(params.string("StreamARN"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("Records", out.records().to_json()),
                ("NextShardIterator", out.next_shard_iterator().to_json()),
                ("MillisBehindLatest", out.millis_behind_latest().to_json()),
                ("ChildShards", out.child_shards().to_json()),
            ])
        }
        Op::CreateStream => {
            client
                .create_stream()
                .stream_name(params.required_str("StreamName")?)
                .set_shard_count(params.i32("ShardCount"))
                .set_stream_mode_details(stream_mode_details(params)?)
                .set_tags(params.string_map("Tags"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::DeleteStream => {
            client
                .delete_stream()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_enforce_consumer_deletion(params.bool("EnforceConsumerDeletion"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::ListStreams => {
            let out = client
                .list_streams()
                .set_limit(params.i32("Limit"))
                .set_exclusive_start_stream_name(params.string("ExclusiveStartStreamName"))
                .set_next_token(params.string("NextToken"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("StreamNames", out.stream_names().to_json()),
                ("HasMoreStreams", out.has_more_streams().to_json()),
                ("NextToken", out.next_token().to_json()),
                ("StreamSummaries", out.stream_summaries().to_json()),
            ])
        }
        Op::DescribeStream => {
            let out = client
                .describe_stream()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_limit(params.i32("Limit"))
                .set_exclusive_start_shard_id(params.string("ExclusiveStartShardId"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([("StreamDescription", out.stream_description().to_json())])
        }
        Op::DescribeStreamSummary => {
            let out = client
                .describe_stream_summary()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([(
                "StreamDescriptionSummary",
                out.stream_description_summary().to_json(),
            )])
        }
        Op::DescribeLimits => {
            let out = client
                .describe_limits()
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("ShardLimit", out.shard_limit().to_json()),
                ("OpenShardCount", out.open_shard_count().to_json()),
                ("OnDemandStreamCount", out.on_demand_stream_count().to_json()),
                (
                    "OnDemandStreamCountLimit",
                    out.on_demand_stream_count_limit().to_json(),
                ),
            ])
        }
        Op::UpdateStreamMode => {
            let details =
                stream_mode_details(params)?.ok_or_else(|| invalid("StreamModeDetails is missing"))?;
            client
                .update_stream_mode()
                .stream_arn(params.required_str("StreamARN")?)
                .stream_mode_details(details)
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::IncreaseStreamRetentionPeriod => {
            client
                .increase_stream_retention_period()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_retention_period_hours(params.i32("RetentionPeriodHours"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::DecreaseStreamRetentionPeriod => {
            client
                .decrease_stream_retention_period()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_retention_period_hours(params.i32("RetentionPeriodHours"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::ListShards => {
            let out = client
                .list_shards()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_next_token(params.string("NextToken"))
                .set_exclusive_start_shard_id(params.string("ExclusiveStartShardId"))
                .set_max_results(params.i32("MaxResults"))
                .set_stream_creation_timestamp(timestamp(params, "StreamCreationTimestamp")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("Shards", out.shards().to_json()),
                ("NextToken", out.next_token().to_json()),
            ])
        }
        Op::GetShardIterator => {
            let out = client
                .get_shard_iterator()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .shard_id(params.required_str("ShardId")?)
                .shard_iterator_type(ShardIteratorType::from(
                    params.required_str("ShardIteratorType")?,
                ))
                .set_starting_sequence_number(params.string("StartingSequenceNumber"))
                .set_timestamp(timestamp(params, "Timestamp")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([("ShardIterator", out.shard_iterator().to_json())])
        }
        Op::UpdateShardCount => {
            let out = client
                .update_shard_count()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_target_shard_count(params.i32("TargetShardCount"))
                .scaling_type(ScalingType::from(params.required_str("ScalingType")?))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("StreamName", out.stream_name().to_json()),
                ("CurrentShardCount", out.current_shard_count().to_json()),
                ("TargetShardCount", out.target_shard_count().to_json()),
                ("StreamARN", out.stream_arn().to_json()),
            ])
        }
        Op::AddTagsToStream => {
            client
                .add_tags_to_stream()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_tags(params.string_map("Tags"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::RemoveTagsFromStream => {
            client
                .remove_tags_from_stream()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_tag_keys(params.strings("TagKeys"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::ListTagsForStream => {
            let out = client
                .list_tags_for_stream()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_exclusive_start_tag_key(params.string("ExclusiveStartTagKey"))
                .set_limit(params.i32("Limit"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("Tags", out.tags().to_json()),
                ("HasMoreTags", out.has_more_tags().to_json()),
            ])
        }
        Op::TagResource => {
            client
                .tag_resource()
                .resource_arn(params.required_str("ResourceARN")?)
                .set_tags(params.string_map("Tags"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::UntagResource => {
            client
                .untag_resource()
                .resource_arn(params.required_str("ResourceARN")?)
                .set_tag_keys(params.strings("TagKeys"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::ListTagsForResource => {
            let out = client
                .list_tags_for_resource()
                .resource_arn(params.required_str("ResourceARN")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([("Tags", out.tags().to_json())])
        }
        Op::StartStreamEncryption => {
            client
                .start_stream_encryption()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .encryption_type(EncryptionType::from(params.required_str("EncryptionType")?))
                .key_id(params.required_str("KeyId")?)
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::StopStreamEncryption => {
            client
                .stop_stream_encryption()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .encryption_type(EncryptionType::from(params.required_str("EncryptionType")?))
                .key_id(params.required_str("KeyId")?)
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::EnableEnhancedMonitoring => {
            let out = client
                .enable_enhanced_monitoring()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_shard_level_metrics(metrics(params))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("StreamName", out.stream_name().to_json()),
                (
                    "CurrentShardLevelMetrics",
                    out.current_shard_level_metrics().to_json(),
                ),
                (
                    "DesiredShardLevelMetrics",
                    out.desired_shard_level_metrics().to_json(),
                ),
                ("StreamARN", out.stream_arn().to_json()),
            ])
        }
        Op::DisableEnhancedMonitoring => {
            let out = client
                .disable_enhanced_monitoring()
                .set_stream_name(params.string("StreamName"))
                .set_stream_arn(params.string("StreamARN"))
                .set_shard_level_metrics(metrics(params))
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("StreamName", out.stream_name().to_json()),
                (
                    "CurrentShardLevelMetrics",
                    out.current_shard_level_metrics().to_json(),
                ),
                (
                    "DesiredShardLevelMetrics",
                    out.desired_shard_level_metrics().to_json(),
                ),
                ("StreamARN", out.stream_arn().to_json()),
            ])
        }
        Op::GetResourcePolicy => {
            let out = client
                .get_resource_policy()
                .resource_arn(params.required_str("ResourceARN")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([("Policy", out.policy().to_json())])
        }
        Op::PutResourcePolicy => {
            client
                .put_resource_policy()
                .resource_arn(params.required_str("ResourceARN")?)
                .policy(params.required_str("Policy")?)
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::DeleteResourcePolicy => {
            client
                .delete_resource_policy()
                .resource_arn(params.required_str("ResourceARN")?)
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
        Op::RegisterStreamConsumer => {
            let out = client
                .register_stream_consumer()
                .stream_arn(params.required_str("StreamARN")?)
                .consumer_name(params.required_str("ConsumerName")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([("Consumer", out.consumer().to_json())])
        }
        Op::DescribeStreamConsumer => {
            let out = client
                .describe_stream_consumer()
                .set_stream_arn(params.string("StreamARN"))
                .set_consumer_name(params.string("ConsumerName"))
                .set_consumer_arn(params.string("ConsumerARN"))
                .send()
                .await
                .map_err(failed(operation))?;
            object([(
                "ConsumerDescription",
                out.consumer_description().to_json(),
            )])
        }
        Op::ListStreamConsumers => {
            let out = client
                .list_stream_consumers()
                .stream_arn(params.required_str("StreamARN")?)
                .set_next_token(params.string("NextToken"))
                .set_max_results(params.i32("MaxResults"))
                .set_stream_creation_timestamp(timestamp(params, "StreamCreationTimestamp")?)
                .send()
                .await
                .map_err(failed(operation))?;
            object([
                ("Consumers", out.consumers().to_json()),
                ("NextToken", out.next_token().to_json()),
            ])
        }
        Op::DeregisterStreamConsumer => {
            client
                .deregister_stream_consumer()
                .set_stream_arn(params.string("StreamARN"))
                .set_consumer_name(params.string("ConsumerName"))
                .set_consumer_arn(params.string("ConsumerARN"))
                .send()
                .await
                .map_err(failed(operation))?;
            json!({})
        }
    };
    Ok(value)
}
