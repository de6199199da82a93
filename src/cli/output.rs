//! CLI output formatting utilities.
//!
//! Only used in SSE mode; in stdio mode stdout belongs to the protocol.

use console::style;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print the SSE startup banner.
    pub fn sse_banner(host: &str, port: u16, base_url: &str) {
        Output::header("ytmcp MCP Server");
        println!();
        Output::success(&format!("SSE server listening on {}:{}", host, port));
        println!();
        println!("Endpoints:");
        Output::kv("Events", &format!("GET  {}/sse", base_url));
        Output::kv("Messages", &format!("POST {}/message?sessionId=...", base_url));
        Output::kv("Health", &format!("GET  {}/health", base_url));
        println!();
        Output::info("Press Ctrl+C to stop the server.");
    }
}
