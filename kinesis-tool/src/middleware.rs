//! The call pipeline between the registry and a tool.
//!
//! A [`ToolCall`] enters at the outermost [`ToolMiddleware`]. Each layer gets
//! a [`Next`] holding the layers below it and the tool itself; dropping `next`
//! instead of running it ends the call there. Argument validation happens
//! inside the tool, so every layer sees the raw input.

use std::sync::Arc;

use kinesis_types::{BoxedFuture, ToolContext, ToolDyn, ToolError, ToolOutput};

/// A tool call in flight through the middleware pipeline.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Identifier of the inbound request carrying this call.
    pub id: String,
    /// Name of the tool being called.
    pub name: String,
    /// Raw JSON arguments, not yet validated.
    pub input: serde_json::Value,
}

/// One layer of the call pipeline.
///
/// The registry keeps layers as `Arc<dyn ToolMiddleware>`, hence the boxed
/// future.
pub trait ToolMiddleware: Send + Sync {
    /// Handle `call`, usually by running `next` and inspecting its result.
    fn process<'a>(
        &'a self,
        call: &'a ToolCall,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>>;
}

/// The layers still to run, ending at the tool.
///
/// `run` takes `self`, so a layer can reach the tool at most once.
pub struct Next<'a> {
    tool: &'a dyn ToolDyn,
    middleware: &'a [Arc<dyn ToolMiddleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(tool: &'a dyn ToolDyn, middleware: &'a [Arc<dyn ToolMiddleware>]) -> Self {
        Self { tool, middleware }
    }

    /// Hand the call to the next layer, or to the tool when none are left.
    pub async fn run(self, call: &'a ToolCall, ctx: &'a ToolContext) -> Result<ToolOutput, ToolError> {
        if let Some((head, tail)) = self.middleware.split_first() {
            let next = Next::new(self.tool, tail);
            head.process(call, ctx, next).await
        } else {
            self.tool.call_dyn(call.input.clone(), ctx).await
        }
    }
}
