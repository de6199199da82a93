//! Caption track selection and timed-text parsing.

use super::models::TranscriptEntry;
use crate::error::{Result, YtmcpError};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

/// A caption track advertised by the player response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// Timed-text URL in the plain XML format.
    pub fn xml_url(&self) -> String {
        self.base_url.replace("&fmt=srv3", "")
    }
}

/// Read the caption tracks from a player response.
///
/// Fails with [`YtmcpError::TranscriptsDisabled`] when the video has none.
pub(crate) fn caption_tracks(player: &Value, video_id: &str) -> Result<Vec<CaptionTrack>> {
    let tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .cloned()
        .map(serde_json::from_value::<Vec<CaptionTrack>>)
        .transpose()
        .map_err(|e| YtmcpError::Youtube(format!("Malformed caption tracks: {}", e)))?
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(YtmcpError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(tracks)
}

/// Pick a track for the first language that has one.
///
/// Within a language, manually created tracks win over generated ones.
pub(crate) fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[&str],
    video_id: &str,
) -> Result<&'a CaptionTrack> {
    for language in languages {
        let mut candidates = tracks.iter().filter(|t| t.language_code == *language);
        let manual = candidates.clone().find(|t| !t.is_generated());
        if let Some(track) = manual.or_else(|| candidates.next()) {
            return Ok(track);
        }
    }

    Err(YtmcpError::NoTranscriptFound {
        video_id: video_id.to_string(),
        requested: languages.iter().map(|l| l.to_string()).collect(),
        available: tracks.iter().map(|t| t.language_code.clone()).collect(),
    })
}

fn text_element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<text\s+([^>]*?)>(.*?)</text>"#).expect("Invalid regex")
    })
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("Invalid regex"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid regex"))
}

/// Decode XML/HTML character references.
///
/// Unknown entities are kept verbatim.
pub(crate) fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse a timed-text XML document into entries, in document order.
///
/// The payload is entity-escaped twice (XML, then HTML), so text is decoded
/// twice. Markup inside captions is stripped and empty captions are dropped.
pub(crate) fn parse_timed_text(xml: &str) -> Vec<TranscriptEntry> {
    text_element_regex()
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());

            let mut start = None;
            let mut duration = 0.0;
            for attr in attribute_regex().captures_iter(attrs) {
                match &attr[1] {
                    "start" => start = attr[2].parse::<f64>().ok(),
                    "dur" => duration = attr[2].parse::<f64>().unwrap_or(0.0),
                    _ => {}
                }
            }

            let text = decode_entities(&decode_entities(raw));
            let text = tag_regex().replace_all(&text, "").trim().to_string();
            if text.is_empty() {
                return None;
            }

            Some(TranscriptEntry::new(start?, duration, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?lang={}&fmt=srv3", lang),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_caption_tracks() {
        let player = json!({
            "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [
                { "baseUrl": "https://x/tt?lang=en", "languageCode": "en", "kind": "asr", "name": { "simpleText": "English" } },
                { "baseUrl": "https://x/tt?lang=de", "languageCode": "de" }
            ] } }
        });

        let tracks = caption_tracks(&player, "vid").unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_generated());
        assert!(!tracks[1].is_generated());
    }

    #[test]
    fn test_caption_tracks_disabled() {
        let err = caption_tracks(&json!({"playabilityStatus": {"status": "OK"}}), "vid").unwrap_err();
        assert!(matches!(err, YtmcpError::TranscriptsDisabled(id) if id == "vid"));
    }

    #[test]
    fn test_select_track_follows_language_order() {
        let tracks = vec![track("ru", None), track("en", Some("asr"))];
        let selected = select_track(&tracks, &["en", "ru"], "vid").unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(selected.is_generated());
    }

    #[test]
    fn test_select_track_prefers_manual() {
        let tracks = vec![track("en", Some("asr")), track("en", None)];
        let selected = select_track(&tracks, &["en"], "vid").unwrap();
        assert!(!selected.is_generated());
    }

    #[test]
    fn test_select_track_none_found() {
        let tracks = vec![track("de", None)];
        match select_track(&tracks, &["en", "ru"], "vid") {
            Err(YtmcpError::NoTranscriptFound { requested, available, .. }) => {
                assert_eq!(requested, vec!["en", "ru"]);
                assert_eq!(available, vec!["de"]);
            }
            other => panic!("Expected NoTranscriptFound, got {:?}", other),
        }
    }

    #[test]
    fn test_xml_url_strips_srv3() {
        assert_eq!(
            track("en", None).xml_url(),
            "https://www.youtube.com/api/timedtext?lang=en"
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#39;hi&#x27;"), "'hi'");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_parse_timed_text() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0" dur="1.5">hi</text>
<text start="1.5" dur="2">don&amp;#39;t &lt;i&gt;stop&lt;/i&gt;</text>
<text start="3.5" dur="1"></text>
<text start="4.5">tail</text>
</transcript>"#;

        let entries = parse_timed_text(xml);
        assert_eq!(
            entries,
            vec![
                TranscriptEntry::new(0.0, 1.5, "hi"),
                TranscriptEntry::new(1.5, 2.0, "don't stop"),
                TranscriptEntry::new(4.5, 0.0, "tail"),
            ]
        );
    }

    #[test]
    fn test_parse_timed_text_multiline() {
        let xml = "<transcript><text start=\"2.0\" dur=\"1.0\">line one\nline two</text></transcript>";
        let entries = parse_timed_text(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "line one\nline two");
    }
}
