//! Resource-based policy tools.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::Value;

use super::{ResourceArgs, definition, resource_arn};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `get_resource_policy`: read the policy attached to a stream or consumer.
    GetResourcePolicy,
    /// `put_resource_policy`: attach a policy to a stream or consumer.
    PutResourcePolicy,
    /// `delete_resource_policy`: remove the policy from a stream or consumer.
    DeleteResourcePolicy,
);

impl Tool for GetResourcePolicy {
    const NAME: &'static str = "get_resource_policy";
    type Args = ResourceArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Get the resource-based policy of a Kinesis stream or consumer.",
            ArgSchema::new().field(resource_arn()),
            ToolAnnotations::read_only(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new().set("ResourceARN", args.resource_arn);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::GetResourcePolicy, params)
            .await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct PutPolicyArgs {
    resource_arn: String,
    policy: String,
    region_name: Option<String>,
}

impl Tool for PutResourcePolicy {
    const NAME: &'static str = "put_resource_policy";
    type Args = PutPolicyArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Attach a resource-based policy to a Kinesis stream or consumer.",
            ArgSchema::new().field(resource_arn()).field(
                Field::string("policy")
                    .len(limits::MIN_POLICY_LENGTH, limits::MAX_POLICY_LENGTH)
                    .required()
                    .describe("Policy document as a JSON string."),
            ),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        match serde_json::from_str::<Value>(&args.policy) {
            Ok(Value::Object(_)) => {}
            Ok(_) => {
                return Err(ToolError::InvalidValue(
                    "policy must be a JSON object".to_string(),
                ));
            }
            Err(e) => {
                return Err(ToolError::InvalidValue(format!(
                    "policy must be valid JSON: {e}"
                )));
            }
        }
        let params = Params::new()
            .set("ResourceARN", args.resource_arn)
            .set("Policy", args.policy);
        Ok(self
            .service
            .call(args.region_name.as_deref(), Operation::PutResourcePolicy, params)
            .await?)
    }
}

impl Tool for DeleteResourcePolicy {
    const NAME: &'static str = "delete_resource_policy";
    type Args = ResourceArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Delete the resource-based policy of a Kinesis stream or consumer.",
            ArgSchema::new().field(resource_arn()),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = Params::new().set("ResourceARN", args.resource_arn);
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DeleteResourcePolicy,
                params,
            )
            .await?)
    }
}

/// Register the policy tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(GetResourcePolicy::new(service.clone()))
        .register(PutResourcePolicy::new(service.clone()))
        .register(DeleteResourcePolicy::new(service.clone()));
}
