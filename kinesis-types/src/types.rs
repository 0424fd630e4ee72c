//! Tool definition, output, and context types.

use serde::{Deserialize, Serialize};

use crate::schema::ArgSchema;

/// Definition of a tool exposed to the calling agent.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// The tool name (unique identifier).
    pub name: String,
    /// Optional human-readable title.
    pub title: Option<String>,
    /// Description of what the tool does, written for the calling agent.
    pub description: String,
    /// Declarative description of the accepted arguments.
    pub arguments: ArgSchema,
    /// Optional behavioral annotations (MCP tool annotations).
    pub annotations: Option<ToolAnnotations>,
}

impl ToolDefinition {
    /// JSON Schema for the tool's input, rendered from [`ToolDefinition::arguments`].
    #[must_use]
    pub fn input_schema(&self) -> serde_json::Value {
        self.arguments.to_json_schema()
    }

    /// Whether the tool is annotated as destructive.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.annotations
            .as_ref()
            .and_then(|a| a.destructive_hint)
            .unwrap_or(false)
    }
}

/// Behavioral annotations for a tool (as defined by MCP).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Whether the tool only reads data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// Whether the tool performs destructive operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    /// Whether repeated calls with same args produce same result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    /// Whether the tool interacts with external systems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

impl ToolAnnotations {
    /// Annotations for a tool that only reads from the external service.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
        }
    }

    /// Annotations for a tool that changes external state without destroying it.
    #[must_use]
    pub fn mutating() -> Self {
        Self {
            read_only_hint: Some(false),
            destructive_hint: Some(false),
            idempotent_hint: Some(false),
            open_world_hint: Some(true),
        }
    }

    /// Annotations for a tool that deletes or irreversibly narrows external state.
    #[must_use]
    pub fn destructive() -> Self {
        Self {
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(false),
            open_world_hint: Some(true),
        }
    }
}

/// A single content item in a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentItem {
    /// Plain text content.
    Text(String),
}

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable content items.
    pub content: Vec<ContentItem>,
    /// Optional structured JSON output for programmatic consumption.
    pub structured_content: Option<serde_json::Value>,
    /// Whether this output represents an error.
    pub is_error: bool,
}

impl ToolOutput {
    /// Output carrying a JSON value, rendered as pretty text and kept as structured content.
    #[must_use]
    pub fn json(value: serde_json::Value) -> Self {
        let text = match &value {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
        Self {
            content: vec![ContentItem::Text(text)],
            structured_content: Some(value),
            is_error: false,
        }
    }

    /// Plain-text output with no structured content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text(text.into())],
            structured_content: None,
            is_error: false,
        }
    }

    /// The "no result" sentinel returned when a runtime failure is suppressed.
    #[must_use]
    pub fn none() -> Self {
        Self::text("null")
    }

    /// Whether this is the "no result" sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.structured_content.is_none()
            && !self.is_error
            && matches!(self.content.as_slice(), [ContentItem::Text(t)] if t == "null")
    }

    /// All text content joined by newlines.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|item| match item {
                ContentItem::Text(t) => t.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runtime context provided to tools during execution.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Identifier of the inbound request, used to correlate log lines.
    pub request_id: String,
}

impl ToolContext {
    /// Create a context for the given request id.
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}
