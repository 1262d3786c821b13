//! The chat panel's state: the transcript plus the single request in flight.

use std::collections::VecDeque;

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ChatReply, ChatRequest, HistoryEntry, HistoryRole, ReplyBody, ReplyPart};
use crate::core::chat_client::ChatError;
use crate::core::message::{Message, TranscriptRole};

/// Shown in place of a reply whenever a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Error: could not reach server.";

pub const WAITING_STATUS: &str = "Waiting for reply…";

/// A request ready to hand to the chat service.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub id: u64,
    pub body: ChatRequest,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: VecDeque<Message>,
    pending: Option<u64>,
    next_request_id: u64,
    send_history: bool,
    status: Option<String>,
}

impl Conversation {
    pub fn new(send_history: bool) -> Self {
        Self {
            messages: VecDeque::new(),
            pending: None,
            next_request_id: 1,
            send_history,
            status: None,
        }
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request_id(&self) -> Option<u64> {
        self.pending
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn add_app_info(&mut self, content: impl Into<String>) {
        self.messages.push_back(Message::app_info(content));
    }

    /// Append the user's text and build the request for it.
    ///
    /// Blank input is ignored, as is any input while an earlier request is
    /// still outstanding.
    pub fn submit(&mut self, input: &str) -> Option<OutboundRequest> {
        if input.trim().is_empty() {
            return None;
        }
        if self.pending.is_some() {
            self.set_status(WAITING_STATUS);
            return None;
        }

        let history = if self.send_history {
            self.history()
        } else {
            Vec::new()
        };

        self.messages.push_back(Message::user(input));

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.pending = Some(id);
        self.clear_status();
        debug!(request_id = id, history = history.len(), "submitted message");

        Some(OutboundRequest {
            id,
            body: ChatRequest {
                message: input.to_string(),
                history,
            },
        })
    }

    /// Record the outcome of request `id`. Returns the message that was
    /// appended, or `None` when the result belongs to a request that is no
    /// longer pending.
    pub fn apply_reply(
        &mut self,
        id: u64,
        result: Result<ChatReply, ChatError>,
    ) -> Option<&Message> {
        if self.pending != Some(id) {
            debug!(request_id = id, "dropping stale reply");
            return None;
        }
        self.pending = None;

        let message = match result {
            Ok(reply) => Message::assistant(normalize_reply(reply.response)),
            Err(err) => {
                warn!(request_id = id, error = %err, "chat request failed");
                Message::app_error(FALLBACK_REPLY)
            }
        };
        self.messages.push_back(message);
        self.messages.back()
    }

    /// Prior user and assistant turns in the endpoint's history shape.
    ///
    /// A turn is only included once it was answered: user messages whose
    /// request failed, or whose reply was empty, are left out together with
    /// the empty reply.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        let mut turns = self
            .messages
            .iter()
            .filter(|msg| msg.role != TranscriptRole::AppInfo)
            .peekable();
        while let Some(msg) = turns.next() {
            match msg.role {
                TranscriptRole::User => {
                    let answered = turns
                        .peek()
                        .is_some_and(|next| next.is_assistant() && !next.content.trim().is_empty());
                    if answered {
                        entries.push(HistoryEntry::new(HistoryRole::User, &msg.content));
                    }
                }
                TranscriptRole::Assistant if !msg.content.trim().is_empty() => {
                    entries.push(HistoryEntry::new(HistoryRole::Model, &msg.content));
                }
                _ => {}
            }
        }
        entries
    }

    /// Forget every message. A reply still in flight will be dropped on
    /// arrival.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending = None;
        self.clear_status();
    }
}

/// Flatten a reply into the Markdown shown for a single assistant message.
pub fn normalize_reply(body: ReplyBody) -> String {
    match body {
        ReplyBody::Text(text) => text,
        ReplyBody::Parts(parts) => parts
            .into_iter()
            .filter_map(render_part)
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

fn render_part(part: ReplyPart) -> Option<String> {
    if let Some(text) = part.text.filter(|text| !text.is_empty()) {
        return Some(text);
    }
    let call = part.function_call?;
    let args = match call.args {
        Value::Null => "{}".to_string(),
        args => serde_json::to_string_pretty(&args).unwrap_or_else(|_| args.to_string()),
    };
    Some(format!(
        "**🛠 Function call:** {}\n\n```json\n{}\n```",
        call.name, args
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FunctionCall;
    use serde_json::json;

    fn failure() -> ChatError {
        ChatError::Status {
            status: 503,
            body: String::new(),
        }
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let mut conversation = Conversation::new(true);
        for input in ["", "   ", "\n\t  \n"] {
            assert!(conversation.submit(input).is_none());
        }
        assert!(conversation.messages().is_empty());
        assert!(!conversation.is_pending());
    }

    #[test]
    fn submit_appends_user_message_and_builds_request() {
        let mut conversation = Conversation::new(true);
        let request = conversation.submit("Plan 3 days in Rome").expect("request");

        assert_eq!(request.body.message, "Plan 3 days in Rome");
        assert!(request.body.history.is_empty());
        assert_eq!(
            conversation.messages().back(),
            Some(&Message::user("Plan 3 days in Rome"))
        );
        assert_eq!(conversation.pending_request_id(), Some(request.id));
    }

    #[test]
    fn successful_reply_appends_one_assistant_message() {
        let mut conversation = Conversation::new(true);
        let request = conversation.submit("hello").expect("request");

        let appended = conversation
            .apply_reply(request.id, Ok(ChatReply::text("Hi! Where to?")))
            .cloned();

        assert_eq!(appended, Some(Message::assistant("Hi! Where to?")));
        assert_eq!(conversation.messages().len(), 2);
        assert!(!conversation.is_pending());
    }

    #[test]
    fn failed_reply_appends_one_fallback_message() {
        let mut conversation = Conversation::new(true);
        let request = conversation.submit("hello").expect("request");

        conversation.apply_reply(request.id, Err(failure()));

        let messages: Vec<_> = conversation.messages().iter().cloned().collect();
        assert_eq!(
            messages,
            vec![Message::user("hello"), Message::app_error(FALLBACK_REPLY)]
        );
        assert!(!conversation.is_pending());
    }

    #[test]
    fn submission_is_refused_while_a_reply_is_pending() {
        let mut conversation = Conversation::new(true);
        let first = conversation.submit("first").expect("request");

        assert!(conversation.submit("second").is_none());
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.status(), Some(WAITING_STATUS));

        conversation.apply_reply(first.id, Ok(ChatReply::text("done")));
        assert!(conversation.submit("second").is_some());
        assert_eq!(conversation.status(), None);
    }

    #[test]
    fn stale_replies_are_ignored() {
        let mut conversation = Conversation::new(true);
        let request = conversation.submit("hello").expect("request");
        conversation.clear();

        assert!(conversation
            .apply_reply(request.id, Ok(ChatReply::text("late")))
            .is_none());
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn history_skips_app_messages_and_failed_turns() {
        let mut conversation = Conversation::new(true);
        conversation.add_app_info("Welcome");
        let first = conversation.submit("one").expect("request");
        conversation.apply_reply(first.id, Ok(ChatReply::text("uno")));
        let second = conversation.submit("two").expect("request");
        conversation.apply_reply(second.id, Err(failure()));

        let third = conversation.submit("three").expect("request");
        assert_eq!(third.body.message, "three");
        assert_eq!(
            third.body.history,
            vec![
                HistoryEntry::new(HistoryRole::User, "one"),
                HistoryEntry::new(HistoryRole::Model, "uno"),
            ]
        );
    }

    #[test]
    fn empty_replies_are_kept_out_of_history() {
        let mut conversation = Conversation::new(true);
        let first = conversation.submit("hi").expect("request");
        conversation.apply_reply(first.id, Ok(ChatReply {
            response: ReplyBody::Parts(Vec::new()),
        }));
        assert_eq!(conversation.messages().back(), Some(&Message::assistant("")));

        let second = conversation.submit("again").expect("request");
        conversation.apply_reply(second.id, Ok(ChatReply::text("Hello again")));

        let third = conversation.submit("and now?").expect("request");
        assert_eq!(
            third.body.history,
            vec![
                HistoryEntry::new(HistoryRole::User, "again"),
                HistoryEntry::new(HistoryRole::Model, "Hello again"),
            ]
        );
    }

    #[test]
    fn history_can_be_disabled() {
        let mut conversation = Conversation::new(false);
        let first = conversation.submit("one").expect("request");
        conversation.apply_reply(first.id, Ok(ChatReply::text("uno")));

        let second = conversation.submit("two").expect("request");
        assert!(second.body.history.is_empty());
    }

    #[test]
    fn parts_reply_is_flattened_into_one_message() {
        let body = ReplyBody::Parts(vec![
            ReplyPart {
                text: Some("Looking up flights.".to_string()),
                function_call: None,
            },
            ReplyPart {
                text: None,
                function_call: Some(FunctionCall {
                    name: "find_flights".to_string(),
                    args: json!({"origin": "JFK"}),
                }),
            },
            ReplyPart::default(),
        ]);

        assert_eq!(
            normalize_reply(body),
            "Looking up flights.\n\n**🛠 Function call:** find_flights\n\n```json\n{\n  \"origin\": \"JFK\"\n}\n```"
        );
    }

    #[test]
    fn empty_text_falls_through_to_function_call() {
        let body = ReplyBody::Parts(vec![ReplyPart {
            text: Some(String::new()),
            function_call: Some(FunctionCall {
                name: "find_flights".to_string(),
                args: json!({}),
            }),
        }]);
        assert_eq!(
            normalize_reply(body),
            "**🛠 Function call:** find_flights\n\n```json\n{}\n```"
        );
    }

    #[test]
    fn function_call_without_args_renders_empty_object() {
        let body = ReplyBody::Parts(vec![ReplyPart {
            text: None,
            function_call: Some(FunctionCall {
                name: "build_itinerary".to_string(),
                args: Value::Null,
            }),
        }]);
        assert!(normalize_reply(body).ends_with("```json\n{}\n```"));
    }
}
