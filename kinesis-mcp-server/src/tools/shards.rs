//! Shard tools: listing, iterators and resharding.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Rule, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{DIGITS, StreamId, definition, identified_by_stream, next_token, shard_id};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `list_shards`: list the shards of a stream.
    ListShards,
    /// `get_shard_iterator`: get a position to start reading a shard from.
    GetShardIterator,
    /// `update_shard_count`: reshard a provisioned stream.
    UpdateShardCount,
);

pub(crate) fn stream_creation_timestamp() -> Field {
    Field::timestamp("stream_creation_timestamp")
        .describe("Creation time of the stream, to disambiguate streams that reuse a name.")
}

#[derive(Debug, Deserialize)]
pub struct ListShardsArgs {
    #[serde(flatten)]
    stream: StreamId,
    exclusive_start_shard_id: Option<String>,
    next_token: Option<String>,
    max_results: i64,
    stream_creation_timestamp: Option<Value>,
    region_name: Option<String>,
}

impl Tool for ListShards {
    const NAME: &'static str = "list_shards";
    type Args = ListShardsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "List the shards of a Kinesis data stream. Pass next_token alone to continue a listing.",
            ArgSchema::new()
                .field(super::stream_name())
                .field(super::stream_arn())
                .field(
                    shard_id("exclusive_start_shard_id")
                        .describe("Shard ID to start listing after."),
                )
                .field(next_token())
                .field(
                    Field::integer("max_results", limits::MIN_LIMIT, limits::MAX_LIMIT)
                        .default(json!(limits::DEFAULT_LIST_SHARDS_MAX_RESULTS))
                        .describe("Maximum number of shards to return."),
                )
                .field(stream_creation_timestamp())
                .rule(Rule::AnyOf(&["stream_name", "stream_arn", "next_token"])),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        // Kinesis rejects a continuation token sent with any of the arguments
        // that start a listing.
        let params = match args.next_token {
            Some(token) => Params::new().set("NextToken", token),
            None => args
                .stream
                .apply(Params::new())
                .set_opt("ExclusiveStartShardId", args.exclusive_start_shard_id)
                .set_opt("StreamCreationTimestamp", args.stream_creation_timestamp),
        }
        .set("MaxResults", args.max_results);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::ListShards, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct GetShardIteratorArgs {
    shard_id: String,
    shard_iterator_type: String,
    #[serde(flatten)]
    stream: StreamId,
    starting_sequence_number: Option<String>,
    timestamp: Option<Value>,
    region_name: Option<String>,
}

impl Tool for GetShardIterator {
    const NAME: &'static str = "get_shard_iterator";
    type Args = GetShardIteratorArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Get a shard iterator marking where get_records starts reading a shard.",
            identified_by_stream(
                ArgSchema::new()
                    .field(shard_id("shard_id").required().describe("Shard to read."))
                    .field(
                        Field::one_of("shard_iterator_type", limits::SHARD_ITERATOR_TYPES)
                            .required()
                            .describe("Where in the shard to start reading."),
                    ),
            )
            .field(
                Field::string("starting_sequence_number")
                    .pattern(&DIGITS)
                    .describe("Sequence number for AT_SEQUENCE_NUMBER and AFTER_SEQUENCE_NUMBER."),
            )
            .field(Field::timestamp("timestamp").describe("Start time for AT_TIMESTAMP."))
            .rule(Rule::RequiredWhen {
                field: "starting_sequence_number",
                when: "shard_iterator_type",
                is_one_of: &["AT_SEQUENCE_NUMBER", "AFTER_SEQUENCE_NUMBER"],
            })
            .rule(Rule::RequiredWhen {
                field: "timestamp",
                when: "shard_iterator_type",
                is_one_of: &["AT_TIMESTAMP"],
            }),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(
                Params::new()
                    .set("ShardId", args.shard_id)
                    .set("ShardIteratorType", args.shard_iterator_type),
            )
            .set_opt("StartingSequenceNumber", args.starting_sequence_number)
            .set_opt("Timestamp", args.timestamp);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::GetShardIterator, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateShardCountArgs {
    #[serde(flatten)]
    stream: StreamId,
    target_shard_count: i64,
    scaling_type: String,
    region_name: Option<String>,
}

impl Tool for UpdateShardCount {
    const NAME: &'static str = "update_shard_count";
    type Args = UpdateShardCountArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Update the shard count of a provisioned Kinesis data stream.",
            identified_by_stream(ArgSchema::new())
                .field(
                    Field::integer(
                        "target_shard_count",
                        limits::MIN_TARGET_SHARD_COUNT,
                        limits::MAX_TARGET_SHARD_COUNT,
                    )
                    .required()
                    .describe("Number of shards after resharding."),
                )
                .field(
                    Field::one_of("scaling_type", limits::SCALING_TYPES)
                        .default(json!(limits::SCALING_TYPES[0]))
                        .describe("How the shards are split or merged."),
                ),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new())
            .set("TargetShardCount", args.target_shard_count)
            .set("ScalingType", args.scaling_type);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::UpdateShardCount, params)
            .await?)
    }
}

/// Register the shard tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(ListShards::new(service.clone()))
        .register(GetShardIterator::new(service.clone()))
        .register(UpdateShardCount::new(service.clone()));
}
