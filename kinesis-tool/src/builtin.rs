//! Built-in middleware implementations.

use std::collections::HashSet;
use std::time::Instant;

use kinesis_types::{BoxedFuture, ToolContext, ToolError, ToolOutput};
use tracing::Instrument;

use crate::middleware::{Next, ToolCall, ToolMiddleware};
use crate::registry::ToolRegistry;

/// Middleware that splits tool failures into the two visible tiers.
///
/// Validation errors ([`ToolError::is_validation`]) always reach the caller.
/// Every other failure is logged and replaced with [`ToolOutput::none`], so
/// one failing call never takes the server down. With `propagate` set (test
/// mode) runtime failures are returned unchanged instead.
pub struct ErrorNormalizer {
    propagate: bool,
}

impl ErrorNormalizer {
    /// Create a normalizer. `propagate` keeps runtime failures visible.
    #[must_use]
    pub fn new(propagate: bool) -> Self {
        Self { propagate }
    }
}

impl ToolMiddleware for ErrorNormalizer {
    fn process<'a>(
        &'a self,
        call: &'a ToolCall,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            match next.run(call, ctx).await {
                Ok(output) => Ok(output),
                Err(e) if e.is_validation() || self.propagate => Err(e),
                Err(e) => {
                    tracing::error!(tool = %call.name, "An error occurred: {e}");
                    Ok(ToolOutput::none())
                }
            }
        })
    }
}

/// Advisory returned by [`DestructiveActionGuard`] when no text is configured.
pub const DESTRUCTIVE_ACTIONS_DISABLED: &str =
    "Destructive actions are disabled for this server. No changes were made.";

/// Middleware that short-circuits destructive tools.
///
/// Snapshots the names of tools annotated `destructive_hint = true` at
/// construction time. Tools registered afterwards are not guarded.
pub struct DestructiveActionGuard {
    destructive: HashSet<String>,
    allow: bool,
    advisory: String,
}

impl DestructiveActionGuard {
    /// Create a guard over the destructive tools currently in `registry`.
    #[must_use]
    pub fn new(registry: &ToolRegistry, allow: bool) -> Self {
        let destructive = registry
            .definitions()
            .into_iter()
            .filter(|def| def.is_destructive())
            .map(|def| def.name)
            .collect();
        Self {
            destructive,
            allow,
            advisory: DESTRUCTIVE_ACTIONS_DISABLED.to_string(),
        }
    }

    /// Replace the advisory text returned for blocked calls.
    #[must_use]
    pub fn with_advisory(mut self, advisory: impl Into<String>) -> Self {
        self.advisory = advisory.into();
        self
    }

    /// Whether calls to `tool` are blocked.
    #[must_use]
    pub fn blocks(&self, tool: &str) -> bool {
        !self.allow && self.destructive.contains(tool)
    }
}

impl ToolMiddleware for DestructiveActionGuard {
    fn process<'a>(
        &'a self,
        call: &'a ToolCall,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        Box::pin(async move {
            if self.blocks(&call.name) {
                tracing::warn!(tool = %call.name, "destructive action blocked");
                return Ok(ToolOutput::text(self.advisory.clone()));
            }
            next.run(call, ctx).await
        })
    }
}

/// Middleware that runs each call inside a `tool_call` span.
///
/// The span carries the tool name and request id; completion is logged at
/// debug with the elapsed time, failures at warn.
pub struct CallTracer;

impl ToolMiddleware for CallTracer {
    fn process<'a>(
        &'a self,
        call: &'a ToolCall,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxedFuture<'a, Result<ToolOutput, ToolError>> {
        let span = tracing::info_span!("tool_call", tool = %call.name, request_id = %call.id);
        Box::pin(
            async move {
                let started = Instant::now();
                let result = next.run(call, ctx).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(output) if output.is_none() => {
                        tracing::debug!(elapsed_ms, "tool call returned no result");
                    }
                    Ok(_) => tracing::debug!(elapsed_ms, "tool call completed"),
                    Err(e) => tracing::warn!(elapsed_ms, error = %e, "tool call failed"),
                }
                result
            }
            .instrument(span),
        )
    }
}
