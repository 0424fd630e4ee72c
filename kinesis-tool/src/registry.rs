//! Tool registry: register, lookup, and execute tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use kinesis_types::{Tool, ToolContext, ToolDefinition, ToolDyn, ToolError, ToolOutput};

use crate::middleware::{Next, ToolCall, ToolMiddleware};

/// Registry of tools with a shared middleware pipeline.
///
/// Tools are stored as type-erased [`ToolDyn`] trait objects, keyed and
/// listed by name.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolDyn>>,
    middleware: Vec<Arc<dyn ToolMiddleware>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            middleware: Vec::new(),
        }
    }

    /// Register a tool under its `NAME`, replacing any tool of the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.tools.insert(T::NAME.to_string(), Arc::new(tool));
        self
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolDyn>> {
        self.tools.get(name).cloned()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for all registered tools, ordered by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Append middleware. The first middleware added is the outermost.
    pub fn add_middleware(&mut self, m: impl ToolMiddleware + 'static) -> &mut Self {
        self.middleware.push(Arc::new(m));
        self
    }

    /// Execute a tool by name, running it through the middleware chain.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for an unknown tool, otherwise whatever
    /// the middleware chain and the tool produce.
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let call = ToolCall {
            id: ctx.request_id.clone(),
            name: name.to_string(),
            input,
        };

        let next = Next::new(tool.as_ref(), &self.middleware);
        next.run(&call, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
