//! Configuration module for ytmcp.
//!
//! Settings are read from an optional TOML file; every key has a default.

mod settings;

pub use settings::{GeneralSettings, Settings, YoutubeSettings};
