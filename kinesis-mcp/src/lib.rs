#![deny(missing_docs)]
//! MCP server exposing a [`ToolRegistry`](kinesis_tool::ToolRegistry).
//!
//! [`McpServer`] serves the registry's tools over stdio. `tools/list`
//! advertises each tool's name, description, JSON Schema, and annotations;
//! `tools/call` runs the registry's middleware chain. Tool failures come back
//! as `isError` results, unknown tools as `invalid_params`.

pub mod error;
pub mod server;

pub use error::McpError;
pub use server::{McpServer, McpServerHandler};
