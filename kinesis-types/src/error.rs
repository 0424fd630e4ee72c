//! Error types shared by the tool layer.

/// Errors from tool operations.
///
/// The variants split into two tiers. [`InvalidType`](ToolError::InvalidType)
/// and [`InvalidValue`](ToolError::InvalidValue) are argument-validation
/// failures and always reach the caller. Everything else is a runtime failure
/// that middleware may log and suppress.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("tool not found: {0}")]
    NotFound(String),
    /// An argument has the wrong JSON type.
    #[error("invalid argument: {0}")]
    InvalidType(String),
    /// An argument is missing, out of range, malformed, or not an allowed value.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Tool execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ToolError {
    /// Whether this error comes from argument validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType(_) | Self::InvalidValue(_))
    }

    /// The bare validation message, without the variant prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidType(msg) | Self::InvalidValue(msg) | Self::NotFound(msg) => msg.clone(),
            Self::ExecutionFailed(source) => source.to_string(),
        }
    }
}
