//! Anthropic Messages API request and response types.

use serde::{Deserialize, Serialize};

/// Default `max_tokens` when the caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

// =============================================================================
// Messages
// =============================================================================

/// Messages API request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model to use (e.g., "claude-opus-4-5-20251101")
    pub model: String,

    /// Maximum tokens to generate (required by the API)
    pub max_tokens: u32,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessagesRequest {
    /// Create a new request with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: Vec::new(),
            system: None,
            temperature: None,
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the system prompt.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Messages API response.
#[derive(Debug, Clone)]
pub struct MessagesResponse {
    /// Concatenated text of all text blocks
    pub content: String,

    /// Why generation stopped ("end_turn", "max_tokens", ...)
    pub stop_reason: Option<String>,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Raw response from API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponseRaw {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponseRaw {
    /// Join the text blocks, ignoring tool use and other block kinds.
    pub(crate) fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub input_tokens: u32,

    /// Tokens in the completion
    pub output_tokens: u32,
}

// =============================================================================
// Utilities
// =============================================================================

/// Strip a markdown code fence wrapped around a model reply.
///
/// Drops the opening fence line (e.g. "```json") and a closing line that is
/// exactly "```". Replies without a leading fence are only trimmed.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = trimmed.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    let body = match body.rsplit_once('\n') {
        Some((head, last)) if last.trim() == "```" => head,
        None if body.trim() == "```" => "",
        _ => body,
    };

    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("Hello").role, "user");
        assert_eq!(Message::assistant("Hi there").role, "assistant");
    }

    #[test]
    fn test_messages_request_builder() {
        let req = MessagesRequest::new("claude-opus-4-5-20251101")
            .message(Message::user("Hello"))
            .temperature(0.7);

        assert_eq!(req.model, "claude-opus-4-5-20251101");
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.temperature, Some(0.7));
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let value = serde_json::to_value(MessagesRequest::new("m")).unwrap();
        assert!(value.get("system").is_none());
        assert!(value.get("temperature").is_none());
        assert_eq!(value["max_tokens"], 1024);
    }

    #[test]
    fn test_raw_response_joins_text_blocks() {
        let raw: MessagesResponseRaw = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"a"},{"type":"tool_use","id":"x"},{"type":"text","text":"b"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(raw.text().as_deref(), Some("ab"));
    }

    #[test]
    fn test_raw_response_without_text() {
        let raw: MessagesResponseRaw = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(raw.text().is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn test_strip_code_fence_keeps_inner_lines() {
        let fenced = "```json\n{\n  \"title\": \"t\"\n}\n```";
        assert_eq!(strip_code_fence(fenced), "{\n  \"title\": \"t\"\n}");
    }
}
