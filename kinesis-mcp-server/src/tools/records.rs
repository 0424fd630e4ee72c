//! Data-plane tools: writing and reading records.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Kind, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{DIGITS, StreamId, definition, identified_by_stream, stream_arn};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `put_records`: write a batch of records in a single call.
    PutRecords,
    /// `get_records`: read records from a shard iterator.
    GetRecords,
);

fn record() -> ArgSchema {
    ArgSchema::new()
        .field(
            Field::string("Data")
                .required()
                .describe("Record payload as UTF-8 text."),
        )
        .field(
            Field::string("PartitionKey")
                .len(limits::MIN_PARTITION_KEY_LENGTH, limits::MAX_PARTITION_KEY_LENGTH)
                .required()
                .describe("Key that determines the destination shard."),
        )
        .field(
            Field::string("ExplicitHashKey")
                .len(1, limits::MAX_EXPLICIT_HASH_KEY_LENGTH)
                .pattern(&DIGITS)
                .describe("Decimal hash value that overrides the partition key hash."),
        )
}

#[derive(Debug, Deserialize)]
pub struct PutRecordsArgs {
    records: Vec<Value>,
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

impl Tool for PutRecords {
    const NAME: &'static str = "put_records";
    type Args = PutRecordsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Write multiple data records into a Kinesis data stream in a single call.",
            identified_by_stream(ArgSchema::new().field(
                Field::list(
                    "records",
                    Kind::Object(record()),
                    limits::MIN_RECORDS,
                    limits::MAX_RECORDS,
                )
                .required()
                .describe("Records to write, each with Data and PartitionKey."),
            )),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new().set("Records", Value::Array(args.records)));
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::PutRecords, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct GetRecordsArgs {
    shard_iterator: String,
    limit: i64,
    stream_arn: Option<String>,
    region_name: Option<String>,
}

impl Tool for GetRecords {
    const NAME: &'static str = "get_records";
    type Args = GetRecordsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Get data records from a Kinesis data stream shard using a shard iterator.",
            ArgSchema::new()
                .field(
                    Field::string("shard_iterator")
                        .len(
                            limits::MIN_SHARD_ITERATOR_LENGTH,
                            limits::MAX_SHARD_ITERATOR_LENGTH,
                        )
                        .required()
                        .describe("Shard iterator returned by get_shard_iterator."),
                )
                .field(
                    Field::integer("limit", limits::MIN_LIMIT, limits::MAX_LIMIT)
                        .default(json!(limits::DEFAULT_GET_RECORDS_LIMIT))
                        .describe("Maximum number of records to return."),
                )
                .field(stream_arn()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("ShardIterator", args.shard_iterator)
            .set("Limit", args.limit)
            .set_opt("StreamARN", args.stream_arn);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::GetRecords, params)
            .await?)
    }
}

/// Register the record tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(PutRecords::new(service.clone()))
        .register(GetRecords::new(service.clone()));
}
