//! ytmcp - YouTube tools over the Model Context Protocol
//!
//! An MCP server exposing three tools to AI assistants:
//!
//! - `youtube_search` - find videos, playlists and channels
//! - `youtube_get_video_info` - fetch details of a single video
//! - `youtube_get_subtitles` - fetch a video's timed subtitles
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `youtube` - Provider traits and the YouTube web client
//! - `mcp` - Protocol types, tool dispatch, stdio and SSE transports
//! - `cli` - Command-line parsing and console output
//!
//! # Example
//!
//! ```rust,no_run
//! use ytmcp::config::Settings;
//! use ytmcp::mcp::{run_stdio, McpServer, ToolHandlers};
//! use ytmcp::youtube::YoutubeClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = YoutubeClient::new(&settings.youtube)?;
//!     let server = McpServer::new(ToolHandlers::from_client(client));
//!
//!     run_stdio(server).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod youtube;

pub use error::{Result, YtmcpError};
