//! Tagging tools, both the stream-scoped and the resource-scoped API.

use std::collections::BTreeMap;

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::Value;

use super::{
    ResourceArgs, StreamId, definition, identified_by_stream, resource_arn, tag_keys, tag_map,
    tags,
};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `add_tags_to_stream`: add or overwrite stream tags.
    AddTagsToStream,
    /// `remove_tags_from_stream`: remove stream tags by key.
    RemoveTagsFromStream,
    /// `list_tags_for_stream`: list the tags of a stream.
    ListTagsForStream,
    /// `tag_resource`: tag a stream or consumer by ARN.
    TagResource,
    /// `untag_resource`: remove tags from a stream or consumer by ARN.
    UntagResource,
    /// `list_tags_for_resource`: list the tags of a stream or consumer by ARN.
    ListTagsForResource,
);

#[derive(Debug, Deserialize)]
pub struct AddTagsArgs {
    tags: BTreeMap<String, String>,
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

impl Tool for AddTagsToStream {
    const NAME: &'static str = "add_tags_to_stream";
    type Args = AddTagsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Add or overwrite tags on a Kinesis data stream.",
            identified_by_stream(ArgSchema::new().field(tags().required())),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new().set("Tags", tag_map(args.tags)));
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::AddTagsToStream, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveTagsArgs {
    tag_keys: Vec<String>,
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

impl Tool for RemoveTagsFromStream {
    const NAME: &'static str = "remove_tags_from_stream";
    type Args = RemoveTagsArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Remove tags from a Kinesis data stream.",
            identified_by_stream(ArgSchema::new().field(tag_keys())),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new().set("TagKeys", args.tag_keys));
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::RemoveTagsFromStream,
                params,
            )
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListTagsForStreamArgs {
    #[serde(flatten)]
    stream: StreamId,
    exclusive_start_tag_key: Option<String>,
    limit: Option<i64>,
    region_name: Option<String>,
}

impl Tool for ListTagsForStream {
    const NAME: &'static str = "list_tags_for_stream";
    type Args = ListTagsForStreamArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "List the tags of a Kinesis data stream.",
            identified_by_stream(ArgSchema::new())
                .field(
                    Field::string("exclusive_start_tag_key")
                        .len(limits::MIN_TAG_KEY_LENGTH, limits::MAX_TAG_KEY_LENGTH)
                        .describe("Tag key to start listing after."),
                )
                .field(
                    Field::integer("limit", limits::MIN_LIMIT, limits::MAX_LIST_TAGS_LIMIT)
                        .describe("Maximum number of tags to return."),
                ),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new())
            .set_opt("ExclusiveStartTagKey", args.exclusive_start_tag_key)
            .set_opt("Limit", args.limit);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::ListTagsForStream, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct TagResourceArgs {
    resource_arn: String,
    tags: BTreeMap<String, String>,
    region_name: Option<String>,
}

impl Tool for TagResource {
    const NAME: &'static str = "tag_resource";
    type Args = TagResourceArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Add or overwrite tags on a Kinesis stream or consumer identified by ARN.",
            ArgSchema::new()
                .field(resource_arn())
                .field(tags().required()),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("ResourceARN", args.resource_arn)
            .set("Tags", tag_map(args.tags));
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::TagResource, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct UntagResourceArgs {
    resource_arn: String,
    tag_keys: Vec<String>,
    region_name: Option<String>,
}

impl Tool for UntagResource {
    const NAME: &'static str = "untag_resource";
    type Args = UntagResourceArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Remove tags from a Kinesis stream or consumer identified by ARN.",
            ArgSchema::new().field(resource_arn()).field(tag_keys()),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new()
            .set("ResourceARN", args.resource_arn)
            .set("TagKeys", args.tag_keys);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::UntagResource, params)
            .await?)
    }
}

impl Tool for ListTagsForResource {
    const NAME: &'static str = "list_tags_for_resource";
    type Args = ResourceArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "List the tags of a Kinesis stream or consumer identified by ARN.",
            ArgSchema::new().field(resource_arn()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new().set("ResourceARN", args.resource_arn);
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::ListTagsForResource,
                params,
            )
            .await?)
    }
}

/// Register the tagging tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(AddTagsToStream::new(service.clone()))
        .register(RemoveTagsFromStream::new(service.clone()))
        .register(ListTagsForStream::new(service.clone()))
        .register(TagResource::new(service.clone()))
        .register(UntagResource::new(service.clone()))
        .register(ListTagsForResource::new(service.clone()));
}
