//! Server-side encryption tools.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Tool, ToolAnnotations, ToolContext, ToolDefinition, ToolError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{StreamId, definition, identified_by_stream};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `start_stream_encryption`: enable server-side encryption with a KMS key.
    StartStreamEncryption,
    /// `stop_stream_encryption`: disable server-side encryption.
    StopStreamEncryption,
);

fn encryption_schema() -> ArgSchema {
    identified_by_stream(ArgSchema::new())
        .field(
            Field::one_of("encryption_type", limits::ENCRYPTION_TYPES)
                .default(json!(limits::ENCRYPTION_TYPES[0]))
                .describe("Encryption type to use."),
        )
        .field(
            Field::string("key_id")
                .len(limits::MIN_KEY_ID_LENGTH, limits::MAX_KEY_ID_LENGTH)
                .default(json!(limits::DEFAULT_KEY_ID))
                .describe("KMS key ID, ARN, alias name or alias ARN."),
        )
}

#[derive(Debug, Deserialize)]
pub struct EncryptionArgs {
    #[serde(flatten)]
    stream: StreamId,
    encryption_type: String,
    key_id: String,
    region_name: Option<String>,
}

impl EncryptionArgs {
    fn into_params(self) -> (Option<String>, Params) {
        let params = self.stream.apply(
            Params::new()
                .set("EncryptionType", self.encryption_type)
                .set("KeyId", self.key_id),
        );
        (self.region_name, params)
    }
}

impl Tool for StartStreamEncryption {
    const NAME: &'static str = "start_stream_encryption";
    type Args = EncryptionArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Enable server-side encryption on a Kinesis data stream using a KMS key.",
            encryption_schema(),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let (region, params) = args.into_params();
        Ok(self
            .service
            .call(region.as_deref(), Operation::StartStreamEncryption, params)
            .await?)
    }
}

impl Tool for StopStreamEncryption {
    const NAME: &'static str = "stop_stream_encryption";
    type Args = EncryptionArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Disable server-side encryption on a Kinesis data stream.",
            encryption_schema(),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let (region, params) = args.into_params();
        Ok(self
            .service
            .call(region.as_deref(), Operation::StopStreamEncryption, params)
            .await?)
    }
}

/// Register the encryption tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(StartStreamEncryption::new(service.clone()))
        .register(StopStreamEncryption::new(service.clone()));
}
