//! stdio transport for the MCP server.
//!
//! Messages are newline-delimited JSON-RPC on stdin/stdout. Nothing else may
//! be written to stdout; logs go to stderr.

use super::protocol::{JsonRpcResponse, PARSE_ERROR};
use super::server::McpServer;
use crate::error::{Result, YtmcpError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Responses waiting to be written.
const WRITE_QUEUE: usize = 64;

/// Serve MCP over the process's stdin and stdout until stdin closes.
pub async fn run_stdio(server: McpServer) -> Result<()> {
    info!("MCP server listening on stdio");
    serve(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve MCP over any line-oriented reader/writer pair.
///
/// Each request is handled on its own task; a single writer task emits the
/// responses, so lines never interleave. A line that is not UTF-8 is answered
/// with a parse error like any other malformed message. Returns once the
/// reader hits EOF and every in-flight request has been answered.
pub async fn serve<R, W>(server: McpServer, mut reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(WRITE_QUEUE);

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(response) = rx.recv().await {
            let json = serde_json::to_string(&response)?;
            writer.write_all(json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<_, YtmcpError>(())
    });

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Discarding non UTF-8 line: {}", e);
                let response = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
                if tx.send(response).await.is_err() {
                    warn!("Dropping response: writer closed");
                }
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        debug!("Received {} bytes", line.len());
        let server = server.clone();
        let tx = tx.clone();
        let line = line.to_string();
        tokio::spawn(async move {
            if let Some(response) = server.handle_message(&line).await {
                if tx.send(response).await.is_err() {
                    warn!("Dropping response: writer closed");
                }
            }
        });
    }

    debug!("Input closed, draining responses");
    drop(tx);

    writer_task
        .await
        .map_err(|e| YtmcpError::Io(std::io::Error::other(e)))?
}
