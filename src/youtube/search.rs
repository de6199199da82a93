//! Parsing of YouTube web pages: embedded JSON, search results and video details.

use super::models::{ItemKind, NextPage, SearchItem, SearchOptions, SearchResults, Thumbnail, VideoDetails};
use crate::error::{Result, YtmcpError};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

const SEARCH_SECTIONS: &str =
    "/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents";

/// Extract the JSON object a page assigns to the global `name`.
///
/// Handles both `var name = {...};` and `window["name"] = {...};`.
pub(crate) fn extract_embedded_json(html: &str, name: &str) -> Result<Value> {
    let markers = [
        format!("var {} = ", name),
        format!("window[\"{}\"] = ", name),
        format!("{} = ", name),
    ];

    let start = markers
        .iter()
        .find_map(|marker| html.find(marker.as_str()).map(|pos| pos + marker.len()))
        .ok_or_else(|| YtmcpError::Youtube(format!("{} not found in page", name)))?;

    // Only the leading object is read; the trailing `;</script>` is ignored.
    let mut deserializer = serde_json::Deserializer::from_str(&html[start..]);
    Value::deserialize(&mut deserializer)
        .map_err(|e| YtmcpError::Youtube(format!("Failed to parse {}: {}", name, e)))
}

/// Extract the InnerTube API key embedded in a page.
pub(crate) fn extract_api_key(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
    });

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read a YouTube text object (`simpleText` or concatenated `runs`).
pub(crate) fn text_of(value: &Value) -> Option<String> {
    if let Some(text) = value.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let text: String = value
        .get("runs")?
        .as_array()?
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();

    (!text.is_empty()).then_some(text)
}

/// Read the `thumbnails` array of a thumbnail container.
pub(crate) fn thumbnails_of(value: Option<&Value>) -> Vec<Thumbnail> {
    value
        .and_then(|v| v.get("thumbnails"))
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn has_live_badge(renderer: &Value) -> bool {
    let badge_live = renderer
        .get("badges")
        .and_then(Value::as_array)
        .is_some_and(|badges| {
            badges.iter().any(|badge| {
                badge.pointer("/metadataBadgeRenderer/style").and_then(Value::as_str)
                    == Some("BADGE_STYLE_TYPE_LIVE_NOW")
            })
        });

    let overlay_live = renderer
        .get("thumbnailOverlays")
        .and_then(Value::as_array)
        .is_some_and(|overlays| {
            overlays.iter().any(|overlay| {
                overlay
                    .pointer("/thumbnailOverlayTimeStatusRenderer/style")
                    .and_then(Value::as_str)
                    == Some("LIVE")
            })
        });

    badge_live || overlay_live
}

fn parse_video(renderer: &Value) -> Option<SearchItem> {
    Some(SearchItem {
        id: str_field(renderer, "videoId")?,
        kind: ItemKind::Video,
        title: renderer.get("title").and_then(text_of).unwrap_or_default(),
        channel_title: renderer
            .get("ownerText")
            .and_then(text_of)
            .or_else(|| renderer.get("longBylineText").and_then(text_of)),
        thumbnails: thumbnails_of(renderer.get("thumbnail")),
        length: renderer.get("lengthText").and_then(text_of),
        view_count: renderer.get("viewCountText").and_then(text_of),
        published: renderer.get("publishedTimeText").and_then(text_of),
        video_count: None,
        is_live: has_live_badge(renderer),
    })
}

fn parse_playlist(renderer: &Value) -> Option<SearchItem> {
    Some(SearchItem {
        id: str_field(renderer, "playlistId")?,
        kind: ItemKind::Playlist,
        title: renderer.get("title").and_then(text_of).unwrap_or_default(),
        channel_title: renderer
            .get("shortBylineText")
            .and_then(text_of)
            .or_else(|| renderer.get("longBylineText").and_then(text_of)),
        thumbnails: thumbnails_of(renderer.pointer("/thumbnails/0")),
        length: None,
        view_count: None,
        published: None,
        video_count: str_field(renderer, "videoCount"),
        is_live: false,
    })
}

fn parse_channel(renderer: &Value) -> Option<SearchItem> {
    Some(SearchItem {
        id: str_field(renderer, "channelId")?,
        kind: ItemKind::Channel,
        title: renderer.get("title").and_then(text_of).unwrap_or_default(),
        channel_title: None,
        thumbnails: thumbnails_of(renderer.get("thumbnail")),
        length: None,
        view_count: None,
        published: None,
        video_count: renderer.get("videoCountText").and_then(text_of),
        is_live: false,
    })
}

fn parse_item(item: &Value, include_playlists: bool) -> Option<SearchItem> {
    if let Some(renderer) = item.get("videoRenderer") {
        parse_video(renderer)
    } else if let Some(renderer) = item.get("playlistRenderer") {
        include_playlists.then(|| parse_playlist(renderer)).flatten()
    } else if let Some(renderer) = item.get("channelRenderer") {
        parse_channel(renderer)
    } else {
        None
    }
}

/// Map a results page's `ytInitialData` to search results.
pub(crate) fn parse_search_data(
    data: &Value,
    options: SearchOptions,
    api_key: Option<String>,
) -> Result<SearchResults> {
    let sections = data
        .pointer(SEARCH_SECTIONS)
        .and_then(Value::as_array)
        .ok_or_else(|| YtmcpError::Youtube("search results not found in page".to_string()))?;

    let mut items = Vec::new();
    let mut continuation = None;

    for section in sections {
        if let Some(token) = section
            .pointer("/continuationItemRenderer/continuationEndpoint/continuationCommand/token")
            .and_then(Value::as_str)
        {
            continuation = Some(token.to_string());
        }

        let Some(contents) = section
            .pointer("/itemSectionRenderer/contents")
            .and_then(Value::as_array)
        else {
            continue;
        };

        for item in contents {
            if items.len() >= options.limit {
                break;
            }
            if let Some(parsed) = parse_item(item, options.include_playlists) {
                items.push(parsed);
            }
        }
    }

    Ok(SearchResults {
        items,
        next_page: continuation.map(|continuation_token| NextPage {
            continuation_token,
            api_key,
        }),
    })
}

/// Parse a full results page.
pub(crate) fn parse_search_page(html: &str, options: SearchOptions) -> Result<SearchResults> {
    let data = extract_embedded_json(html, "ytInitialData")?;
    parse_search_data(&data, options, extract_api_key(html))
}

/// Map an InnerTube player response's `videoDetails` to [`VideoDetails`].
pub(crate) fn parse_video_details(player: &Value, video_id: &str) -> Result<VideoDetails> {
    let details = player
        .get("videoDetails")
        .ok_or_else(|| YtmcpError::Youtube(format!("no video details for {}", video_id)))?;

    let number = |key: &str| {
        details.get(key).and_then(|v| match v {
            Value::String(s) => s.parse::<u64>().ok(),
            other => other.as_u64(),
        })
    };

    Ok(VideoDetails {
        id: str_field(details, "videoId").unwrap_or_else(|| video_id.to_string()),
        title: str_field(details, "title").unwrap_or_default(),
        channel: str_field(details, "author"),
        channel_id: str_field(details, "channelId"),
        description: str_field(details, "shortDescription").filter(|d| !d.is_empty()),
        keywords: details
            .get("keywords")
            .and_then(Value::as_array)
            .map(|words| {
                words
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        length_seconds: number("lengthSeconds"),
        view_count: number("viewCount"),
        thumbnails: thumbnails_of(details.get("thumbnail")),
        is_live: details
            .get("isLive")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
