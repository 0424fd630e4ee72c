//! Enhanced fan-out consumer tools.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Rule, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::shards::stream_creation_timestamp;
use super::{STREAM_NAME, definition, next_token, stream_arn};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `register_stream_consumer`: register an enhanced fan-out consumer.
    RegisterStreamConsumer,
    /// `describe_stream_consumer`: describe a registered consumer.
    DescribeStreamConsumer,
    /// `list_stream_consumers`: list the consumers of a stream.
    ListStreamConsumers,
    /// `deregister_stream_consumer`: remove a registered consumer.
    DeregisterStreamConsumer,
);

fn consumer_name() -> Field {
    Field::string("consumer_name")
        .len(limits::MIN_CONSUMER_NAME_LENGTH, limits::MAX_CONSUMER_NAME_LENGTH)
        .pattern(&STREAM_NAME)
        .describe("Name of the consumer.")
}

/// A consumer is addressed by its ARN, or by its name together with the stream ARN.
fn consumer_identity() -> ArgSchema {
    ArgSchema::new()
        .field(
            Field::string("consumer_arn")
                .len(limits::MIN_ARN_LENGTH, limits::MAX_ARN_LENGTH)
                .describe("ARN of the consumer."),
        )
        .field(consumer_name())
        .field(stream_arn())
        .rule(Rule::AnyOf(&["consumer_arn", "consumer_name"]))
        .rule(Rule::RequiredWith {
            field: "stream_arn",
            with: "consumer_name",
            unless: &["consumer_arn"],
        })
}

#[derive(Debug, Deserialize)]
pub struct ConsumerIdArgs {
    consumer_arn: Option<String>,
    consumer_name: Option<String>,
    stream_arn: Option<String>,
    region_name: Option<String>,
}

impl ConsumerIdArgs {
    fn params(&self) -> Params {
        Params::new()
            .set_opt("StreamARN", self.stream_arn.clone())
            .set_opt("ConsumerName", self.consumer_name.clone())
            .set_opt("ConsumerARN", self.consumer_arn.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterConsumerArgs {
    stream_arn: String,
    consumer_name: String,
    region_name: Option<String>,
}

impl Tool for RegisterStreamConsumer {
    const NAME: &'static str = "register_stream_consumer";
    type Args = RegisterConsumerArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Register an enhanced fan-out consumer with a Kinesis data stream.",
            ArgSchema::new()
                .field(stream_arn().required())
                .field(consumer_name().required()),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("StreamARN", args.stream_arn)
            .set("ConsumerName", args.consumer_name);
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::RegisterStreamConsumer,
                params,
            )
            .await?)
    }
}

impl Tool for DescribeStreamConsumer {
    const NAME: &'static str = "describe_stream_consumer";
    type Args = ConsumerIdArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Describe a stream consumer, by consumer_arn or by consumer_name and stream_arn.",
            consumer_identity(),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DescribeStreamConsumer,
                args.params(),
            )
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListConsumersArgs {
    stream_arn: String,
    next_token: Option<String>,
    max_results: i64,
    stream_creation_timestamp: Option<Value>,
    region_name: Option<String>,
}

impl Tool for ListStreamConsumers {
    const NAME: &'static str = "list_stream_consumers";
    type Args = ListConsumersArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "List the consumers registered with a Kinesis data stream.",
            ArgSchema::new()
                .field(stream_arn().required())
                .field(next_token())
                .field(
                    Field::integer("max_results", limits::MIN_LIMIT, limits::MAX_LIMIT)
                        .default(json!(limits::DEFAULT_LIST_CONSUMERS_MAX_RESULTS))
                        .describe("Maximum number of consumers to return."),
                )
                .field(stream_creation_timestamp()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("StreamARN", args.stream_arn)
            .set_opt("NextToken", args.next_token)
            .set("MaxResults", args.max_results)
            .set_opt("StreamCreationTimestamp", args.stream_creation_timestamp);
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::ListStreamConsumers,
                params,
            )
            .await?)
    }
}

impl Tool for DeregisterStreamConsumer {
    const NAME: &'static str = "deregister_stream_consumer";
    type Args = ConsumerIdArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Deregister a stream consumer, by consumer_arn or by consumer_name and stream_arn.",
            consumer_identity(),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DeregisterStreamConsumer,
                args.params(),
            )
            .await?)
    }
}

/// Register the consumer tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(RegisterStreamConsumer::new(service.clone()))
        .register(DescribeStreamConsumer::new(service.clone()))
        .register(ListStreamConsumers::new(service.clone()))
        .register(DeregisterStreamConsumer::new(service.clone()));
}
