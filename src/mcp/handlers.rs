//! Tool handlers: call the providers and format their results as text.

use super::tools::ToolRequest;
use crate::error::Result;
use crate::youtube::{
    SearchOptions, SearchProvider, TranscriptEntry, TranscriptProvider, YoutubeClient,
};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Number of results requested from the search provider.
pub const SEARCH_LIMIT: usize = 5;

/// Subtitle languages, in order of preference.
pub const SUBTITLE_LANGUAGES: [&str; 2] = ["en", "ru"];

/// Dispatches validated tool requests to the providers.
#[derive(Clone)]
pub struct ToolHandlers {
    search: Arc<dyn SearchProvider>,
    transcripts: Arc<dyn TranscriptProvider>,
}

impl ToolHandlers {
    pub fn new(search: Arc<dyn SearchProvider>, transcripts: Arc<dyn TranscriptProvider>) -> Self {
        Self {
            search,
            transcripts,
        }
    }

    /// Serve every tool from one YouTube client.
    pub fn from_client(client: YoutubeClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Run a request and return its text payload.
    pub async fn invoke(&self, request: &ToolRequest) -> Result<String> {
        debug!("Invoking {}", request.tool_name());

        match request {
            ToolRequest::Search { query } => self.search(query).await,
            ToolRequest::GetVideoInfo { video_id } => self.video_info(video_id).await,
            ToolRequest::GetSubtitles { video_id } => self.subtitles(video_id).await,
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        let options = SearchOptions {
            limit: SEARCH_LIMIT,
            include_playlists: true,
        };
        let results = self.search.search(query, options).await?;
        Ok(serde_json::to_string_pretty(&results)?)
    }

    async fn video_info(&self, video_id: &str) -> Result<String> {
        let details = self.search.video_details(video_id).await?;
        Ok(serde_json::to_string_pretty(&details)?)
    }

    async fn subtitles(&self, video_id: &str) -> Result<String> {
        let transcript = self
            .transcripts
            .transcript(video_id, &SUBTITLE_LANGUAGES)
            .await?;
        Ok(format_transcript(&transcript.entries))
    }
}

/// Prefix for a provider failure of the given request.
pub fn failure_context(request: &ToolRequest) -> &'static str {
    match request {
        ToolRequest::Search { .. } => "Error getting data",
        ToolRequest::GetVideoInfo { .. } => "Error getting video details",
        ToolRequest::GetSubtitles { .. } => "Error getting transcript",
    }
}

/// Format entries as `[start - end]: text` lines, one per entry, in order.
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        let _ = writeln!(
            output,
            "[{:.2} - {:.2}]: {}",
            entry.start,
            entry.end(),
            entry.text
        );
    }
    output
}
