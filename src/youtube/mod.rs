//! YouTube data providers.
//!
//! The MCP tools only talk to the [`SearchProvider`] and [`TranscriptProvider`]
//! traits. [`YoutubeClient`] implements both against YouTube's web endpoints;
//! tests substitute stubs.

mod client;
mod models;
mod search;
mod transcript;

pub use client::YoutubeClient;
pub use models::{
    ItemKind, NextPage, SearchItem, SearchOptions, SearchResults, Thumbnail, Transcript,
    TranscriptEntry, VideoDetails,
};

use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// Search and video metadata lookups.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for videos, playlists and channels matching a free-text query.
    async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchResults>;

    /// Fetch details for a single video.
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails>;
}

/// Subtitle lookups.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the transcript of a video in the first available language of `languages`.
    async fn transcript(&self, video_id: &str, languages: &[&str]) -> Result<Transcript>;
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches various YouTube URL formats and bare video IDs
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract a video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;

    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Normalize a caller-supplied video reference.
///
/// URLs are reduced to their video ID; anything else is passed through trimmed
/// so the provider can report what is wrong with it.
pub fn normalize_video_id(input: &str) -> String {
    extract_video_id(input).unwrap_or_else(|| input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));

        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_normalize_video_id() {
        assert_eq!(normalize_video_id(" aBcDeFgHiJk "), "aBcDeFgHiJk");
        assert_eq!(normalize_video_id("https://youtu.be/aBcDeFgHiJk"), "aBcDeFgHiJk");
        assert_eq!(normalize_video_id("short"), "short");
    }
}
