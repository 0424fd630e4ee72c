//! The tool trait and its type-erased counterpart.

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ToolError;
use crate::types::{ToolContext, ToolDefinition, ToolOutput};

/// A boxed, sendable future.
pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A strongly-typed tool.
///
/// Implementors describe their arguments with an
/// [`ArgSchema`](crate::schema::ArgSchema) inside [`Tool::definition`]. The
/// blanket [`ToolDyn`] impl validates raw input against that schema before
/// deserializing it into [`Tool::Args`], so `call` only ever sees arguments
/// that passed validation.
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;
    /// The deserialized input type.
    type Args: DeserializeOwned + Send;
    /// The serializable output type.
    type Output: Serialize;
    /// The tool-specific error type.
    type Error: Into<ToolError> + Send;

    /// Returns the tool definition (name, description, argument schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with typed arguments.
    fn call(
        &self,
        args: Self::Args,
        ctx: &ToolContext,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Type-erased tool for dynamic dispatch. Blanket-implemented for all [`Tool`] impls.
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name.
    fn name(&self) -> &str;
    /// The tool definition.
    fn definition(&self) -> ToolDefinition;
    /// Execute the tool with a JSON value input.
    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>>;
}

/// Blanket implementation: any `Tool` automatically becomes a `ToolDyn`.
///
/// Handles:
/// - Validating and normalizing the raw input against the tool's schema
/// - Deserializing the normalized input into `T::Args`
/// - Calling `T::call(args, ctx)`
/// - Serializing `T::Output` into `ToolOutput`
impl<T: Tool> ToolDyn for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    fn call_dyn<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            let normalized = Tool::definition(self).arguments.validate(input)?;

            let args: T::Args = serde_json::from_value(normalized)
                .map_err(|e| ToolError::InvalidValue(e.to_string()))?;

            let output = self.call(args, ctx).await.map_err(Into::into)?;

            let structured = serde_json::to_value(&output)
                .map_err(|e| ToolError::ExecutionFailed(Box::new(e)))?;

            Ok(ToolOutput::json(structured))
        })
    }
}
