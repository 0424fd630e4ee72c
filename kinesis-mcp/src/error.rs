//! Errors from serving the MCP protocol.

/// Errors from MCP operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// The MCP initialization handshake failed.
    #[error("initialization failed: {0}")]
    Initialization(String),
    /// The transport closed abnormally while serving.
    #[error("transport error: {0}")]
    Transport(String),
}
