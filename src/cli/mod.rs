//! CLI module for ytmcp.

mod output;

pub use output::Output;

use clap::{Parser, ValueEnum};

/// ytmcp - YouTube tools over MCP
///
/// Serves YouTube search, video details and subtitles to MCP clients over
/// stdio or server-sent events.
#[derive(Parser, Debug)]
#[command(name = "ytmcp")]
#[command(version, about, long_about = None, disable_help_flag = true)]
pub struct Cli {
    /// Transport type
    #[arg(short = 't', long, value_enum, default_value_t = Transport::Sse)]
    pub transport: Transport,

    /// Host of sse server
    #[arg(short = 'h', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port of sse server
    #[arg(short = 'p', long, default_value_t = 8889)]
    pub port: u16,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

/// How the MCP server talks to its client.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// HTTP with server-sent events
    Sse,
}

impl Cli {
    /// Log filter for the requested verbosity, falling back to `default_level`.
    pub fn log_level<'a>(&self, default_level: &'a str) -> &'a str {
        match self.verbose {
            0 => default_level,
            1 => "debug",
            _ => "trace",
        }
    }
}
