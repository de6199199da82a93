//! MCP (Model Context Protocol) server for ytmcp.
//!
//! Exposes YouTube search, video details and subtitles as tools.
//! Implements JSON-RPC 2.0 over stdio or HTTP with server-sent events.

mod handlers;
mod protocol;
mod server;
mod sse;
mod tools;
mod transport;

pub use handlers::{format_transcript, ToolHandlers, SEARCH_LIMIT, SUBTITLE_LANGUAGES};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Tool, PROTOCOL_VERSION};
pub use server::McpServer;
pub use sse::{base_url, bind_sse, router, run_sse};
pub use tools::{get_tools, ToolRequest};
pub use transport::{run_stdio, serve};
