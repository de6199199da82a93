//! YouTube web client.
//!
//! Search results come from the public results page. Video details and caption
//! tracks come from the InnerTube `player` endpoint, keyed with the API key
//! embedded in the watch page.

use super::models::{SearchOptions, SearchResults, Transcript, VideoDetails};
use super::search::{extract_api_key, parse_search_page, parse_video_details};
use super::transcript::{caption_tracks, parse_timed_text, select_track};
use super::{SearchProvider, TranscriptProvider};
use crate::config::YoutubeSettings;
use crate::error::{Result, YtmcpError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// InnerTube client identity used for player requests.
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

/// HTTP client for YouTube's web endpoints.
#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    base_url: String,
}

impl YoutubeClient {
    /// Create a client from settings.
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&settings.accept_language)
                .map_err(|e| YtmcpError::Config(format!("Invalid accept_language: {}", e)))?,
        );
        // Skips the EU cookie consent interstitial.
        headers.insert(COOKIE, HeaderValue::from_static("CONSENT=YES+1"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch", self.base_url);
        self.get_text(&url, &[("v", video_id)]).await
    }

    /// Fetch the InnerTube player response for a playable video.
    async fn fetch_player(&self, video_id: &str) -> Result<Value> {
        let html = self.fetch_watch_page(video_id).await?;

        if html.contains("class=\"g-recaptcha\"") {
            return Err(YtmcpError::Youtube(
                "YouTube is rate limiting requests from this address".to_string(),
            ));
        }

        let api_key = extract_api_key(&html).ok_or_else(|| {
            YtmcpError::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: "watch page did not contain an API key".to_string(),
            }
        })?;

        let url = format!("{}/youtubei/v1/player", self.base_url);
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let player: Value = self
            .http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        check_playability(&player, video_id)?;
        Ok(player)
    }
}

/// Fail unless the player response reports the video as playable.
fn check_playability(player: &Value, video_id: &str) -> Result<()> {
    let status = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
        .unwrap_or("OK");

    if status == "OK" {
        return Ok(());
    }

    let reason = player
        .pointer("/playabilityStatus/reason")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    Err(YtmcpError::VideoUnavailable {
        video_id: video_id.to_string(),
        reason,
    })
}

#[async_trait]
impl SearchProvider for YoutubeClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchResults> {
        let url = format!("{}/results", self.base_url);
        let html = self.get_text(&url, &[("search_query", query)]).await?;

        let results = parse_search_page(&html, options)?;
        debug!("Search returned {} items", results.items.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails> {
        let player = self.fetch_player(video_id).await?;
        parse_video_details(&player, video_id)
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeClient {
    #[instrument(skip(self))]
    async fn transcript(&self, video_id: &str, languages: &[&str]) -> Result<Transcript> {
        let player = self.fetch_player(video_id).await?;
        let tracks = caption_tracks(&player, video_id)?;
        let track = select_track(&tracks, languages, video_id)?;

        debug!(
            "Selected {} track (generated: {})",
            track.language_code,
            track.is_generated()
        );

        let xml = self.get_text(&track.xml_url(), &[]).await?;
        let entries = parse_timed_text(&xml);
        debug!("Parsed {} transcript entries", entries.len());

        Ok(Transcript {
            video_id: video_id.to_string(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated(),
            entries,
        })
    }
}
