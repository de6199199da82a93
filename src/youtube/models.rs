//! Data types returned by the YouTube providers.

use serde::{Deserialize, Serialize};

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if hands us a &bool
fn is_false(b: &bool) -> bool {
    !*b
}

/// Options controlling a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of items to return.
    pub limit: usize,
    /// Include playlist results alongside videos and channels.
    pub include_playlists: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            include_playlists: true,
        }
    }
}

/// Kind of a search result item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Video,
    Playlist,
    Channel,
}

/// A thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    /// Video, playlist or channel id.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<Thumbnail>,
    /// Human-readable length, e.g. `"4:13"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    /// Relative publish time, e.g. `"3 years ago"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    /// Number of videos, for playlists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_count: Option<String>,
    #[serde(default)]
    pub is_live: bool,
}

/// Continuation data for fetching the next results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPage {
    pub continuation_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Results of a search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub items: Vec<SearchItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<NextPage>,
}

/// Details of a single video.
///
/// `id` and `title` always come first in the serialised form; everything
/// else is omitted when unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_live: bool,
}

/// One timed caption unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }

    /// End offset in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A fetched transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    /// Language code of the track that was selected.
    pub language_code: String,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    pub entries: Vec<TranscriptEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_details_omits_unknown_fields() {
        let details = VideoDetails {
            id: "aBcDeFgHiJk".to_string(),
            title: "T".to_string(),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_string_pretty(&details).unwrap(),
            "{\n  \"id\": \"aBcDeFgHiJk\",\n  \"title\": \"T\"\n}"
        );
    }

    #[test]
    fn test_search_item_kind_serializes_as_type() {
        let item = SearchItem {
            id: "PLx".to_string(),
            kind: ItemKind::Playlist,
            title: "Mix".to_string(),
            channel_title: None,
            thumbnails: vec![],
            length: None,
            view_count: None,
            published: None,
            video_count: Some("12".to_string()),
            is_live: false,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "playlist");
        assert_eq!(json["videoCount"], "12");
        assert!(json.get("channelTitle").is_none());
    }

    #[test]
    fn test_transcript_entry_end() {
        let entry = TranscriptEntry::new(1.5, 2.0, "there");
        assert!((entry.end() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_search_options() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 5);
        assert!(options.include_playlists);
    }
}
