//! Error types for ytmcp.

use thiserror::Error;

/// Library-level error type for ytmcp operations.
#[derive(Error, Debug)]
pub enum YtmcpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected YouTube response: {0}")]
    Youtube(String),

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error(
        "No transcript found for video {video_id} in languages {requested:?} (available: {available:?})"
    )]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl YtmcpError {
    /// Whether this error was caused by the caller's input rather than a provider.
    pub fn is_validation(&self) -> bool {
        matches!(self, YtmcpError::InvalidArgument(_) | YtmcpError::UnknownTool(_))
    }
}

/// Result type alias for ytmcp operations.
pub type Result<T> = std::result::Result<T, YtmcpError>;
