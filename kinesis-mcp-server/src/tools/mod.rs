//! The Kinesis tool catalog.
//!
//! Every tool declares its arguments as an [`ArgSchema`], receives them
//! already validated and defaulted, maps them onto Kinesis wire names and
//! forwards them through the [`KinesisService`].

/// Declare tool structs that hold a [`KinesisService`] handle.
macro_rules! kinesis_tools {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub struct $name {
                service: $crate::client::KinesisService,
            }

            impl $name {
                /// Create the tool over `service`.
                #[must_use]
                pub fn new(service: $crate::client::KinesisService) -> Self {
                    Self { service }
                }
            }
        )*
    };
}

pub mod consumers;
pub mod encryption;
pub mod monitoring;
pub mod policy;
pub mod records;
pub mod shards;
pub mod streams;
pub mod tags;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use kinesis_tool::{CallTracer, DestructiveActionGuard, ErrorNormalizer, ToolRegistry};
use kinesis_types::{ArgSchema, Field, Pattern, Rule, StringKind, ToolAnnotations, ToolDefinition};
use serde::Deserialize;
use serde_json::Value;

use crate::client::{KinesisService, Params};
use crate::config::ServerConfig;
use crate::limits;

pub(crate) static STREAM_NAME: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"^[a-zA-Z0-9._-]+$",
        "alphanumeric characters, hyphens, underscores, and periods",
    )
});

pub(crate) static SHARD_ID: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"^[a-zA-Z0-9_.-]+$",
        "alphanumeric characters, underscores, periods, and hyphens",
    )
});

pub(crate) static DIGITS: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"^\d+$", "digits"));

/// Advisory returned by destructive tools while destructive actions are disabled.
pub const DESTRUCTIVE_DISABLED_ADVISORY: &str = "Destructive actions are disabled. \
     Restart the server with --allow-destructive (or KINESIS_MCP_ALLOW_DESTRUCTIVE=true) \
     to delete or narrow Kinesis resources.";

pub(crate) fn region_name() -> Field {
    Field::string("region_name")
        .len(limits::MIN_REGION_LENGTH, limits::MAX_REGION_LENGTH)
        .describe("Region to run the operation in. Defaults to the server's configured region.")
}

pub(crate) fn stream_name() -> Field {
    Field::string("stream_name")
        .len(limits::MIN_STREAM_NAME_LENGTH, limits::MAX_STREAM_NAME_LENGTH)
        .pattern(&STREAM_NAME)
        .describe("Name of the stream.")
}

pub(crate) fn stream_arn() -> Field {
    Field::string("stream_arn")
        .len(limits::MIN_ARN_LENGTH, limits::MAX_ARN_LENGTH)
        .describe("ARN of the stream.")
}

pub(crate) fn resource_arn() -> Field {
    Field::string("resource_arn")
        .len(limits::MIN_ARN_LENGTH, limits::MAX_ARN_LENGTH)
        .required()
        .describe("ARN of the stream or consumer.")
}

pub(crate) fn shard_id(name: &'static str) -> Field {
    Field::string(name)
        .len(limits::MIN_SHARD_ID_LENGTH, limits::MAX_SHARD_ID_LENGTH)
        .pattern(&SHARD_ID)
}

pub(crate) fn next_token() -> Field {
    Field::string("next_token")
        .len(limits::MIN_NEXT_TOKEN_LENGTH, limits::MAX_NEXT_TOKEN_LENGTH)
        .describe("Pagination token from a previous response.")
}

pub(crate) fn tag_key() -> StringKind {
    StringKind {
        min_len: limits::MIN_TAG_KEY_LENGTH,
        max_len: Some(limits::MAX_TAG_KEY_LENGTH),
        ..StringKind::default()
    }
}

pub(crate) fn tags() -> Field {
    Field::map(
        "tags",
        limits::MAX_TAGS_COUNT,
        tag_key(),
        StringKind {
            min_len: limits::MIN_TAG_VALUE_LENGTH,
            max_len: Some(limits::MAX_TAG_VALUE_LENGTH),
            ..StringKind::default()
        },
    )
    .describe("Tags as key/value pairs.")
}

pub(crate) fn tag_keys() -> Field {
    Field::list(
        "tag_keys",
        kinesis_types::Kind::String(tag_key()),
        limits::MIN_TAG_KEYS,
        limits::MAX_TAG_KEYS,
    )
    .required()
    .describe("Keys of the tags to remove.")
}

/// Add the stream identifier pair: `stream_name` and/or `stream_arn`, at least one.
pub(crate) fn identified_by_stream(schema: ArgSchema) -> ArgSchema {
    schema
        .field(stream_name())
        .field(stream_arn())
        .rule(Rule::AnyOf(&["stream_name", "stream_arn"]))
}

pub(crate) fn definition(
    name: &str,
    description: &str,
    arguments: ArgSchema,
    annotations: ToolAnnotations,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        title: None,
        description: description.to_string(),
        arguments: arguments.field(region_name()),
        annotations: Some(annotations),
    }
}

pub(crate) fn tag_map(tags: BTreeMap<String, String>) -> Value {
    Value::Object(tags.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}

/// Stream identifier arguments shared by most tools.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamId {
    pub stream_name: Option<String>,
    pub stream_arn: Option<String>,
}

impl StreamId {
    /// Forward whichever identifiers were given.
    #[must_use]
    pub fn apply(self, params: Params) -> Params {
        params
            .set_opt("StreamName", self.stream_name)
            .set_opt("StreamARN", self.stream_arn)
    }
}

/// Arguments of tools that only address a resource by ARN.
#[derive(Debug, Deserialize)]
pub struct ResourceArgs {
    pub resource_arn: String,
    pub region_name: Option<String>,
}

/// Register every Kinesis tool against `service`.
pub fn register_all(registry: &mut ToolRegistry, service: &KinesisService) {
    records::register(registry, service);
    streams::register(registry, service);
    shards::register(registry, service);
    tags::register(registry, service);
    encryption::register(registry, service);
    monitoring::register(registry, service);
    policy::register(registry, service);
    consumers::register(registry, service);
}

/// Build the registry served over MCP.
///
/// Middleware runs outermost first: tracing, then error normalization, then
/// the destructive-action guard.
#[must_use]
pub fn build_registry(service: KinesisService, config: &ServerConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_all(&mut registry, &service);

    let guard = DestructiveActionGuard::new(&registry, config.allow_destructive)
        .with_advisory(DESTRUCTIVE_DISABLED_ADVISORY);
    registry
        .add_middleware(CallTracer)
        .add_middleware(ErrorNormalizer::new(config.testing))
        .add_middleware(guard);
    registry
}
