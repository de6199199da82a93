//! MCP tool definitions and argument validation.

use super::protocol::Tool;
use crate::error::{Result, YtmcpError};
use crate::youtube::normalize_video_id;
use serde_json::{json, Value};

pub const SEARCH_TOOL: &str = "youtube_search";
pub const VIDEO_INFO_TOOL: &str = "youtube_get_video_info";
pub const SUBTITLES_TOOL: &str = "youtube_get_subtitles";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: SEARCH_TOOL.to_string(),
            description: "Find videos on youtube".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "text query"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: VIDEO_INFO_TOOL.to_string(),
            description: "Get video details".to_string(),
            input_schema: video_id_schema(),
        },
        Tool {
            name: SUBTITLES_TOOL.to_string(),
            description: "Get youtube video subtitles".to_string(),
            input_schema: video_id_schema(),
        },
    ]
}

fn video_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "videoID": {
                "type": "string",
                "description": "videoID, for example aBcDeFgHiJk"
            }
        },
        "required": ["videoID"]
    })
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Search { query: String },
    GetVideoInfo { video_id: String },
    GetSubtitles { video_id: String },
}

impl ToolRequest {
    /// Validate a raw `tools/call` into a typed request.
    pub fn parse(name: &str, arguments: Option<&Value>) -> Result<Self> {
        match name {
            SEARCH_TOOL => Ok(ToolRequest::Search {
                query: required_string(arguments, "query")?,
            }),
            VIDEO_INFO_TOOL => Ok(ToolRequest::GetVideoInfo {
                video_id: normalize_video_id(&required_string(arguments, "videoID")?),
            }),
            SUBTITLES_TOOL => Ok(ToolRequest::GetSubtitles {
                video_id: normalize_video_id(&required_string(arguments, "videoID")?),
            }),
            _ => Err(YtmcpError::UnknownTool(name.to_string())),
        }
    }

    /// Name of the tool this request targets.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::Search { .. } => SEARCH_TOOL,
            ToolRequest::GetVideoInfo { .. } => VIDEO_INFO_TOOL,
            ToolRequest::GetSubtitles { .. } => SUBTITLES_TOOL,
        }
    }
}

fn required_string(arguments: Option<&Value>, key: &str) -> Result<String> {
    match arguments.and_then(|args| args.get(key)) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(YtmcpError::InvalidArgument(format!("{} must be a string", key))),
        None => Err(YtmcpError::InvalidArgument(format!("Missing '{}' argument", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_unique() {
        let tools = get_tools();
        let mut names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_schemas_require_single_string() {
        for tool in get_tools() {
            let required = tool.input_schema["required"].as_array().unwrap();
            assert_eq!(required.len(), 1);
            let key = required[0].as_str().unwrap();
            assert_eq!(tool.input_schema["properties"][key]["type"], "string");
        }
    }

    #[test]
    fn test_parse_search() {
        let args = json!({"query": "rust async"});
        assert_eq!(
            ToolRequest::parse(SEARCH_TOOL, Some(&args)).unwrap(),
            ToolRequest::Search { query: "rust async".to_string() }
        );
    }

    #[test]
    fn test_parse_video_id_from_url() {
        let args = json!({"videoID": "https://youtu.be/aBcDeFgHiJk"});
        assert_eq!(
            ToolRequest::parse(SUBTITLES_TOOL, Some(&args)).unwrap(),
            ToolRequest::GetSubtitles { video_id: "aBcDeFgHiJk".to_string() }
        );
    }

    #[test]
    fn test_parse_missing_argument() {
        let err = ToolRequest::parse(VIDEO_INFO_TOOL, Some(&json!({}))).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Missing 'videoID'"));

        let err = ToolRequest::parse(SEARCH_TOOL, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = ToolRequest::parse(SEARCH_TOOL, Some(&json!({"query": 42}))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: query must be a string");
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolRequest::parse("youtube_download", None).unwrap_err();
        assert!(matches!(err, YtmcpError::UnknownTool(_)));
    }
}
