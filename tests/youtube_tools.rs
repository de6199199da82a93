//! End-to-end tool calls: MCP over an in-memory stream, backed by the real
//! YouTube client pointed at a local fake of YouTube's web endpoints.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};
use ytmcp::config::YoutubeSettings;
use ytmcp::mcp::{serve, McpServer, ToolHandlers};
use ytmcp::youtube::YoutubeClient;

const VIDEO_ID: &str = "aBcDeFgHiJk";
const NO_CAPTIONS_ID: &str = "noCaptions1";

async fn results_page() -> String {
    let data = json!({
        "contents": { "twoColumnSearchResultsRenderer": { "primaryContents": {
            "sectionListRenderer": { "contents": [
                { "itemSectionRenderer": { "contents": [
                    { "videoRenderer": {
                        "videoId": VIDEO_ID,
                        "title": { "runs": [{ "text": "Rust in 100 seconds" }] },
                        "ownerText": { "runs": [{ "text": "Fireship" }] },
                        "lengthText": { "simpleText": "2:29" }
                    } },
                    { "playlistRenderer": {
                        "playlistId": "PLrust",
                        "title": { "simpleText": "Rust course" },
                        "videoCount": "42"
                    } }
                ] } }
            ] }
        } } }
    });

    format!(
        "<html><script>var ytcfg = {{\"INNERTUBE_API_KEY\":\"fakeKey\"}};</script>\
         <script>var ytInitialData = {};</script></html>",
        data
    )
}

async fn watch_page() -> &'static str {
    r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY":"fakeKey"});</script></html>"#
}

async fn player(State(base_url): State<String>, Json(body): Json<Value>) -> Json<Value> {
    let video_id = body["videoId"].as_str().unwrap_or_default();

    let response = match video_id {
        VIDEO_ID => json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": {
                "videoId": VIDEO_ID,
                "title": "Rust in 100 seconds",
                "author": "Fireship",
                "lengthSeconds": "149",
                "viewCount": "1000"
            },
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
                { "baseUrl": format!("{}/api/timedtext?v={}&lang=en&fmt=srv3", base_url, VIDEO_ID),
                  "languageCode": "en" }
            ] } }
        }),
        NO_CAPTIONS_ID => json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": { "videoId": NO_CAPTIONS_ID, "title": "Silent" }
        }),
        _ => json!({
            "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" }
        }),
    };

    Json(response)
}

async fn timed_text(Query(params): Query<HashMap<String, String>>) -> String {
    assert!(!params.contains_key("fmt"), "caption url should request plain XML");
    r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.25">Hello &amp;amp; welcome</text><text start="1.75" dur="2">second line</text></transcript>"#
        .to_string()
}

/// Serve a fake YouTube on an ephemeral port and return its origin.
async fn spawn_fake_youtube() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new()
        .route("/results", get(results_page))
        .route("/watch", get(watch_page))
        .route("/youtubei/v1/player", post(player))
        .route("/api/timedtext", get(timed_text))
        .with_state(base_url.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url
}

struct McpClient {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
}

impl McpClient {
    async fn start() -> Self {
        let base_url = spawn_fake_youtube().await;
        let client = YoutubeClient::new(&YoutubeSettings::default())
            .unwrap()
            .with_base_url(base_url);
        let server = McpServer::new(ToolHandlers::from_client(client));

        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_io);
        tokio::spawn(serve(server, BufReader::new(server_read), server_write));

        let (read, writer) = tokio::io::split(client_io);
        Self {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    async fn call_tool(&mut self, id: u64, name: &str, arguments: Value) -> Value {
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        self.writer
            .write_all(format!("{}\n", request).as_bytes())
            .await
            .unwrap();

        let line = self.lines.next_line().await.unwrap().expect("server closed");
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["id"], id);
        response["result"].clone()
    }
}

fn text_of(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_search_through_fake_youtube() {
    let mut mcp = McpClient::start().await;

    let result = mcp.call_tool(1, "youtube_search", json!({ "query": "rust" })).await;
    assert!(result.get("isError").is_none());

    let results: Value = serde_json::from_str(text_of(&result)).unwrap();
    let items = results["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], VIDEO_ID);
    assert_eq!(items[0]["type"], "video");
    assert_eq!(items[0]["title"], "Rust in 100 seconds");
    assert_eq!(items[1]["type"], "playlist");
}

#[tokio::test]
async fn test_video_info_through_fake_youtube() {
    let mut mcp = McpClient::start().await;

    let result = mcp
        .call_tool(
            2,
            "youtube_get_video_info",
            json!({ "videoID": format!("https://www.youtube.com/watch?v={}", VIDEO_ID) }),
        )
        .await;

    let details: Value = serde_json::from_str(text_of(&result)).unwrap();
    assert_eq!(details["id"], VIDEO_ID);
    assert_eq!(details["title"], "Rust in 100 seconds");
    assert_eq!(details["channel"], "Fireship");
    assert_eq!(details["lengthSeconds"], 149);
}

#[tokio::test]
async fn test_subtitles_through_fake_youtube() {
    let mut mcp = McpClient::start().await;

    let result = mcp
        .call_tool(3, "youtube_get_subtitles", json!({ "videoID": VIDEO_ID }))
        .await;

    assert_eq!(
        text_of(&result),
        "[0.50 - 1.75]: Hello & welcome\n[1.75 - 3.75]: second line\n"
    );
}

#[tokio::test]
async fn test_provider_failures_are_tool_errors() {
    let mut mcp = McpClient::start().await;

    let result = mcp
        .call_tool(4, "youtube_get_video_info", json!({ "videoID": "gone0000000" }))
        .await;
    assert_eq!(result["isError"], true);
    assert_eq!(
        text_of(&result),
        "Error getting video details: Video gone0000000 is unavailable: Video unavailable"
    );

    let result = mcp
        .call_tool(5, "youtube_get_subtitles", json!({ "videoID": NO_CAPTIONS_ID }))
        .await;
    assert_eq!(result["isError"], true);
    assert!(text_of(&result).starts_with("Error getting transcript: "));
}
