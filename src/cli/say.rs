//! TUI-less "say" command

use std::error::Error;

use ratatui::crossterm::terminal;
use tracing::debug;

use crate::core::chat_client::{ChatTransport, HttpTransport};
use crate::core::config::Settings;
use crate::core::conversation::{Conversation, FALLBACK_REPLY};
use crate::core::message::Message;
use crate::ui::markdown::{render_message, MessageRenderConfig};
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub async fn run_say(prompt: Vec<String>, settings: Settings) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: destin say <prompt>");
        std::process::exit(1);
    }

    let logging = LoggingState::new(settings.log_file.clone())?;
    let transport = HttpTransport::new(settings.endpoint.clone(), settings.request_timeout)?;
    let transcript = exchange(&transport, &prompt).await;
    for message in &transcript {
        logging.log_message(message)?;
    }

    let Some(reply) = transcript.last().filter(|message| message.is_assistant()) else {
        eprintln!("❌ {FALLBACK_REPLY}");
        std::process::exit(1);
    };

    let width = terminal::size().ok().map(|(w, _)| w as usize);
    for line in format_reply(reply, settings.markdown, width) {
        println!("{line}");
    }
    Ok(())
}

/// Send one message with no history. Returns the exchange as it would
/// appear in the chat: the user message, then the reply or the fallback error.
pub async fn exchange(transport: &dyn ChatTransport, prompt: &str) -> Vec<Message> {
    let mut conversation = Conversation::new(false);
    if let Some(request) = conversation.submit(prompt) {
        debug!(request_id = request.id, "sending one-shot request");
        let result = transport.send(&request.body).await;
        conversation.apply_reply(request.id, result);
    }
    conversation.messages().iter().cloned().collect()
}

/// Reply lines for stdout: monochrome Markdown when enabled, otherwise the
/// raw text.
pub fn format_reply(reply: &Message, markdown: bool, width: Option<usize>) -> Vec<String> {
    if !markdown {
        return reply.content.lines().map(str::to_string).collect();
    }
    let mut lines: Vec<String> = render_message(
        reply,
        &Theme::monochrome(),
        MessageRenderConfig::markdown(true).with_width(width),
    )
    .iter()
    .map(|line| line.to_string())
    .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}
