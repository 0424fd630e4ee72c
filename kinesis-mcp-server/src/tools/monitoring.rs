//! Enhanced shard-level monitoring tools.

use kinesis_tool::ToolRegistry;
use kinesis_types::{
    ArgSchema, Field, Kind, StringKind, Tool, ToolAnnotations, ToolContext, ToolDefinition,
    ToolError,
};
use serde::Deserialize;
use serde_json::Value;

use super::{StreamId, definition, identified_by_stream};
use crate::client::{KinesisService, Operation, Params};
use crate::limits;

kinesis_tools!(
    /// `enable_enhanced_monitoring`: turn on shard-level metrics.
    EnableEnhancedMonitoring,
    /// `disable_enhanced_monitoring`: turn off shard-level metrics.
    DisableEnhancedMonitoring,
);

fn monitoring_schema() -> ArgSchema {
    identified_by_stream(ArgSchema::new().field(
        Field::list(
            "shard_level_metrics",
            Kind::String(StringKind {
                one_of: Some(limits::SHARD_LEVEL_METRICS),
                ..StringKind::default()
            }),
            limits::MIN_SHARD_LEVEL_METRICS,
            limits::MAX_SHARD_LEVEL_METRICS,
        )
        .required()
        .describe("Shard-level metrics, or [\"ALL\"]."),
    ))
}

#[derive(Debug, Deserialize)]
pub struct MonitoringArgs {
    shard_level_metrics: Vec<String>,
    #[serde(flatten)]
    stream: StreamId,
    region_name: Option<String>,
}

impl Tool for EnableEnhancedMonitoring {
    const NAME: &'static str = "enable_enhanced_monitoring";
    type Args = MonitoringArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Enable enhanced shard-level CloudWatch metrics for a Kinesis data stream.",
            monitoring_schema(),
            ToolAnnotations::mutating(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new().set("ShardLevelMetrics", args.shard_level_metrics));
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::EnableEnhancedMonitoring,
                params,
            )
            .await?)
    }
}

impl Tool for DisableEnhancedMonitoring {
    const NAME: &'static str = "disable_enhanced_monitoring";
    type Args = MonitoringArgs;
    type Output = Value;
    type Error = ToolError;

    fn definition(&self) -> ToolDefinition {
        definition(
            Self::NAME,
            "Disable enhanced shard-level CloudWatch metrics for a Kinesis data stream.",
            monitoring_schema(),
            ToolAnnotations::destructive(),
        )
    }

    async fn call(&self, args: Self::Args, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let params = args
            .stream
            .apply(Params::new().set("ShardLevelMetrics", args.shard_level_metrics));
        Ok(self
            .service
            .call(
                args.region_name.as_deref(),
                Operation::DisableEnhancedMonitoring,
                params,
            )
            .await?)
    }
}

/// Register the monitoring tools.
pub fn register(registry: &mut ToolRegistry, service: &KinesisService) {
    registry
        .register(EnableEnhancedMonitoring::new(service.clone()))
        .register(DisableEnhancedMonitoring::new(service.clone()));
}
