//! Stream lifecycle tools.

use std::collections::BTreeMap;

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    StreamId, definition, identified_by_stream, shard_id, stream_arn, stream_name, tag_map, tags,
};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `create_stream`: create a new data stream.
    CreateStream,
    /// `delete_stream`: delete a stream and all of its shards and data.
    DeleteStream,
    /// `list_streams`: list the streams in the region.
    ListStreams,
    /// `describe_stream`: describe a stream including its shards.
    DescribeStream,
    /// `describe_stream_summary`: describe a stream without its shard list.
    DescribeStreamSummary,
    /// `describe_limits`: shard limits and usage for the account.
    DescribeLimits,
    /// `update_stream_mode`: switch a stream between capacity modes.
    UpdateStreamMode,
    /// `increase_stream_retention_period`: keep records for longer.
    IncreaseStreamRetentionPeriod,
    /// `decrease_stream_retention_period`: keep records for less time.
    DecreaseStreamRetentionPeriod,
);

fn stream_mode_details() -> Field {
    Field::object(
        "stream_mode_details",
        ArgSchema::new().field(Field::one_of("StreamMode", limits::STREAM_MODES).required()),
    )
    .describe("Capacity mode of the stream, e.g. {\"StreamMode\": \"ON_DEMAND\"}.")
}

fn retention_period_hours() -> Field {
    Field::integer(
        "retention_period_hours",
        limits::MIN_RETENTION_HOURS,
        limits::MAX_RETENTION_HOURS,
    )
    .required()
    .describe("New retention period in hours.")
}

#[derive(Debug, Deserialize)]
pub struct CreateStreamArgs {
    stream_name: String,
    shard_count: Option<i64>,
    stream_mode_details: Value,
    tags: Option<BTreeMap<String, String>>,
    region_name: Option<String>,
}

impl Tool for CreateStream {
    const NAME: &'static str = "create_stream";
    type Args = CreateStreamArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Create a Kinesis data stream. Provisioned streams use shard_count (default 1).",
            ArgSchema::new()
                .field(stream_name().reserved_prefix("aws:").required())
                .field(
                    Field::integer(
                        "shard_count",
                        limits::MIN_SHARDS_PER_STREAM,
                        limits::MAX_SHARDS_PER_STREAM,
                    )
                    .describe("Number of shards for a PROVISIONED stream."),
                )
                .field(
                    stream_mode_details()
                        .default(json!({"StreamMode": limits::STREAM_MODE_ON_DEMAND})),
                )
                .field(tags()),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let provisioned = args.stream_mode_details.get("StreamMode").and_then(Value::as_str)
            == Some(limits::STREAM_MODE_PROVISIONED);
        let params = Params::new()
            .set("StreamName", args.stream_name)
            .set_opt(
                "ShardCount",
                provisioned.then(|| args.shard_count.unwrap_or(limits::DEFAULT_SHARD_COUNT)),
            )
            .set("StreamModeDetails", args.stream_mode_details)
            .set_opt("Tags", args.tags.map(tag_map));
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::CreateStream, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteStreamArgs {
    #[serde(flatten)]
    stream: StreamId,
    enforce_consumer_deletion: Option<bool>,
    region_name: Option<String>,
}

impl Tool for DeleteStream {
    const NAME: &'static str = "delete_stream";
    type Args = DeleteStreamArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Delete a Kinesis data stream and all its shards and data.",
            identified_by_stream(ArgSchema::new()).field(
                Field::boolean("enforce_consumer_deletion")
                    .describe("Delete the stream even if it still has registered consumers."),
            ),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new())
            .set_opt("EnforceConsumerDeletion", args.enforce_consumer_deletion);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::DeleteStream, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListStreamsArgs {
    exclusive_start_stream_name: Option<String>,
    limit: i64,
    next_token: Option<String>,
    region_name: Option<String>,
}

impl Tool for ListStreams {
    const NAME: &'static str = "list_streams";
    type Args = ListStreamsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "List the Kinesis data streams in the region.",
            ArgSchema::new()
                .field(
                    Field::string("exclusive_start_stream_name")
                        .len(limits::MIN_STREAM_NAME_LENGTH, limits::MAX_STREAM_NAME_LENGTH)
                        .describe("Stream name to start listing after."),
                )
                .field(
                    Field::integer("limit", limits::MIN_LIMIT, limits::MAX_LIST_STREAMS_LIMIT)
                        .default(json!(limits::DEFAULT_LIST_STREAMS_LIMIT))
                        .describe("Maximum number of streams to return."),
                )
                .field(super::next_token()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set_opt("ExclusiveStartStreamName", args.exclusive_start_stream_name)
            .set("Limit", args.limit)
            .set_opt("NextToken", args.next_token);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::ListStreams, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct DescribeStreamArgs {
    #[serde(flatten)]
    stream: StreamId,
    limit: i64,
    exclusive_start_shard_id: Option<String>,
    region_name: Option<String>,
}

impl Tool for DescribeStream {
    const NAME: &'static str = "describe_stream";
    type Args = DescribeStreamArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Describe a Kinesis data stream, including its shards.",
            identified_by_stream(ArgSchema::new())
                .field(
                    Field::integer("limit", limits::MIN_LIMIT, limits::MAX_LIMIT)
                        .default(json!(limits::DEFAULT_DESCRIBE_STREAM_LIMIT))
                        .describe("Maximum number of shards to return."),
                )
                .field(
                    shard_id("exclusive_start_shard_id")
                        .describe("Shard ID to start listing after."),
                ),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new())
            .set("Limit", args.limit)
            .set_opt("ExclusiveStartShardId", args.exclusive_start_shard_id);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::DescribeStream, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamArgs {
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

impl Tool for DescribeStreamSummary {
    const NAME: &'static str = "describe_stream_summary";
    type Args = StreamArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Summarize a Kinesis data stream without listing its shards.",
            identified_by_stream(ArgSchema::new()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args.stream.apply(Params::new());
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DescribeStreamSummary,
                params,
            )
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionArgs {
    region_name: Option<String>,
}

impl Tool for DescribeLimits {
    const NAME: &'static str = "describe_limits";
    type Args = RegionArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Describe the shard limits and usage for the account.",
            ArgSchema::new(),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DescribeLimits,
                Params::new(),
            )
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStreamModeArgs {
    stream_arn: String,
    stream_mode_details: Value,
    region_name: Option<String>,
}

impl Tool for UpdateStreamMode {
    const NAME: &'static str = "update_stream_mode";
    type Args = UpdateStreamModeArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Switch a Kinesis data stream between ON_DEMAND and PROVISIONED capacity modes.",
            ArgSchema::new()
                .field(stream_arn().required())
                .field(stream_mode_details().required()),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("StreamARN", args.stream_arn)
            .set("StreamModeDetails", args.stream_mode_details);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::UpdateStreamMode, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct RetentionArgs {
    retention_period_hours: i64,
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Increase,
    Decrease,
}

fn retention_definition(
    name: &str,
    description: &str,
    annotations: ToolAnnotations,
) -> ToolDefinition {
    definition(
        name,
        description,
        identified_by_stream(ArgSchema::new().field(retention_period_hours())),
        annotations,
    )
}

/// Check the requested retention against the stream's current one, then apply it.
async fn change_retention(
    service: &KinesisService,
    args: RetentionArgs,
    direction: Direction,
) -> Result<Value, ToolError> {
    let region = args.region_name.as_deref();
    let summary = service
        .call(
            region,
            Operation::DescribeStreamSummary,
            args.stream.clone().apply(Params::new()),
        )
        .await?;
    let current = summary
        .pointer("/StreamDescriptionSummary/RetentionPeriodHours")
        .and_then(Value::as_i64);

    let requested = args.retention_period_hours;
    if let Some(current) = current {
        match direction {
            Direction::Increase if requested <= current => {
                return Err(ToolError::InvalidValue(format!(
                    "retention_period_hours ({requested}) must be greater than the current retention period ({current})"
                )));
            }
            Direction::Decrease if requested >= current => {
                return Err(ToolError::InvalidValue(format!(
                    "retention_period_hours ({requested}) must be less than the current retention period ({current})"
                )));
            }
            _ => {}
        }
    }

    let operation = match direction {
        Direction::Increase => Operation::IncreaseStreamRetentionPeriod,
        Direction::Decrease => Operation::DecreaseStreamRetentionPeriod,
    };
    let params = args
        .stream
        .apply(Params::new().set("RetentionPeriodHours", requested));
    Ok(service.call(region, operation, params).await?)
}

impl Tool for IncreaseStreamRetentionPeriod {
    const NAME: &'static str = "increase_stream_retention_period";
    type Args = RetentionArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        retention_definition(
            Self::NAME,
            "Increase how long a Kinesis data stream retains records (24 to 8760 hours).",
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        change_retention(&self.service, args, Direction::Increase).await
    }
}

impl Tool for DecreaseStreamRetentionPeriod {
    const NAME: &'static str = "decrease_stream_retention_period";
    type Args = RetentionArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        retention_definition(
            Self::NAME,
            "Decrease how long a Kinesis data stream retains records. Records older than the new period become inaccessible.",
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        change_retention(&self.service, args, Direction::Decrease).await
    }
}

/// Register the stream lifecycle tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(CreateStream::new(service.clone()))
        .register(DeleteStream::new(service.clone()))
        .register(ListStreams::new(service.clone()))
        .register(DescribeStream::new(service.clone()))
        .register(DescribeStreamSummary::new(service.clone()))
        .register(DescribeLimits::new(service.clone()))
        .register(UpdateStreamMode::new(service.clone()))
        .register(IncreaseStreamRetentionPeriod::new(service.clone()))
        .register(DecreaseStreamRetentionPeriod::new(service.clone()));
}
