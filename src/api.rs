//! JSON payloads exchanged with the chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST` to the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// A prior turn, in the shape the service forwards to its model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    pub text: String,
}

impl HistoryEntry {
    pub fn new(role: HistoryRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TextPart { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: ReplyBody,
}

/// The endpoint answers with either a plain string or a list of parts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyBody {
    Text(String),
    Parts(Vec<ReplyPart>),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ReplyPart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: ReplyBody::Text(response.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_message_and_history() {
        let request = ChatRequest {
            message: "Plan a weekend in Lisbon".to_string(),
            history: vec![
                HistoryEntry::new(HistoryRole::User, "hi"),
                HistoryEntry::new(HistoryRole::Model, "hello"),
            ],
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({
                "message": "Plan a weekend in Lisbon",
                "history": [
                    {"role": "user", "parts": [{"text": "hi"}]},
                    {"role": "model", "parts": [{"text": "hello"}]}
                ]
            })
        );
    }

    #[test]
    fn empty_history_serializes_as_empty_array() {
        let request = ChatRequest {
            message: "hello".to_string(),
            history: Vec::new(),
        };
        let text = serde_json::to_string(&request).expect("serialize");
        assert_eq!(text, r#"{"message":"hello","history":[]}"#);
    }

    #[test]
    fn string_reply_decodes_as_text() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response": "Here is your **plan**"}"#).expect("decode");
        assert_eq!(
            reply.response,
            ReplyBody::Text("Here is your **plan**".to_string())
        );
    }

    #[test]
    fn parts_reply_decodes_text_and_function_calls() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"response": [
                {"text": "Searching flights"},
                {"function_call": {"name": "find_flights", "args": {"origin": "NYC"}}},
                {"inline_data": "ignored"}
            ]}"#,
        )
        .expect("decode");

        let ReplyBody::Parts(parts) = reply.response else {
            panic!("expected parts reply");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].text.as_deref(), Some("Searching flights"));
        let call = parts[1].function_call.as_ref().expect("function call");
        assert_eq!(call.name, "find_flights");
        assert_eq!(call.args, json!({"origin": "NYC"}));
        assert_eq!(parts[2], ReplyPart::default());
    }

    #[test]
    fn reply_without_response_field_is_rejected() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"detail": "Not Found"}"#).is_err());
    }
}
