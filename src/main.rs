//! ytmcp entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ytmcp::cli::{Cli, Output, Transport};
use ytmcp::config::Settings;
use ytmcp::mcp::{base_url, bind_sse, run_sse, run_stdio, McpServer, ToolHandlers};
use ytmcp::youtube::YoutubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => {
            let path = Settings::expand_path(path);
            Settings::load_from(Some(path.as_path()))?
        }
        None => Settings::load()?,
    };

    // Initialize logging; stderr only, stdout may carry the protocol
    let log_level = cli.log_level(&settings.general.log_level);
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ytmcp={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let client = YoutubeClient::new(&settings.youtube)?;
    let server = McpServer::new(ToolHandlers::from_client(client));

    match cli.transport {
        Transport::Stdio => {
            run_stdio(server).await?;
        }

        Transport::Sse => {
            let listener = bind_sse(&cli.host, cli.port).await?;
            let base_url = base_url(&cli.host, cli.port);
            Output::sse_banner(&cli.host, cli.port, &base_url);
            run_sse(server, listener, base_url).await?;
        }
    }

    Ok(())
}
