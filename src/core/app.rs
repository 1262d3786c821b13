//! Session state owned by the event loop.

use std::time::Instant;

use ratatui::style::Style;
use ratatui::text::Line;
use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::api::ChatReply;
use crate::commands::{self, CommandResult};
use crate::core::chat_client::ChatError;
use crate::core::config::Settings;
use crate::core::conversation::{Conversation, OutboundRequest};
use crate::core::message::Message;
use crate::ui::layout::LayoutEngine;
use crate::ui::markdown::MessageRenderConfig;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

pub const INPUT_PLACEHOLDER: &str = "Ask DestinAI...";

/// Prewrapped transcript lines for one width/markdown combination.
struct LayoutCache {
    revision: u64,
    width: u16,
    markdown: bool,
    lines: Vec<Line<'static>>,
}

pub struct App {
    pub conversation: Conversation,
    pub settings: Settings,
    pub theme: Theme,
    pub markdown: bool,
    pub input: TextArea<'static>,
    pub logging: LoggingState,
    pub scroll_offset: usize,
    pub auto_scroll: bool,
    /// Largest valid offset as of the last frame.
    pub max_scroll_offset: usize,
    pub pulse_start: Instant,
    pub should_quit: bool,
    revision: u64,
    layout_cache: Option<LayoutCache>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let theme = Theme::from_name(&settings.theme);
        let logging = LoggingState::new(settings.log_file.clone())?;
        let mut app = Self {
            conversation: Conversation::new(settings.send_history),
            markdown: settings.markdown,
            input: new_input(&theme),
            theme,
            settings,
            logging,
            scroll_offset: 0,
            auto_scroll: true,
            max_scroll_offset: 0,
            pulse_start: Instant::now(),
            should_quit: false,
            revision: 0,
            layout_cache: None,
        };
        app.add_info(format!(
            "Connected to {}. Type a message and press Enter; /help lists commands.",
            app.settings.endpoint
        ));
        Ok(app)
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    pub fn clear_input(&mut self) {
        self.input = new_input(&self.theme);
    }

    /// Handle Enter in the input box. Returns the request to send, if any.
    pub fn submit_input(&mut self) -> Option<OutboundRequest> {
        let text = self.input_text();
        if text.trim().is_empty() {
            return None;
        }

        match commands::process_input(self, &text) {
            CommandResult::Continue => {
                self.clear_input();
                None
            }
            CommandResult::Quit => {
                self.should_quit = true;
                None
            }
            CommandResult::ProcessAsMessage(message) => {
                let request = self.conversation.submit(&message)?;
                self.clear_input();
                self.after_append();
                Some(request)
            }
        }
    }

    pub fn apply_reply(&mut self, id: u64, result: Result<ChatReply, ChatError>) {
        if self.conversation.apply_reply(id, result).is_some() {
            self.after_append();
        }
    }

    pub fn add_info(&mut self, content: impl Into<String>) {
        self.conversation.add_app_info(content);
        self.touch();
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
        self.scroll_to_bottom();
        self.touch();
    }

    pub fn set_markdown(&mut self, enabled: bool) {
        self.markdown = enabled;
        self.touch();
    }

    /// Log the newest message and follow the transcript tail.
    fn after_append(&mut self) {
        if let Some(last) = self.conversation.messages().back() {
            debug!(role = last.role.as_str(), "message appended");
            if let Err(e) = self.logging.log_message(last) {
                warn!(error = %e, "failed to write transcript log");
                self.conversation.set_status(format!("Log error: {e}"));
            }
        }
        self.scroll_to_bottom();
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.conversation.messages().iter()
    }

    /// Transcript lines wrapped to `width`, rebuilt only when the transcript,
    /// width, or markdown mode changed.
    pub fn transcript_lines(&mut self, width: u16) -> &[Line<'static>] {
        let stale = self.layout_cache.as_ref().is_none_or(|cache| {
            cache.revision != self.revision
                || cache.width != width
                || cache.markdown != self.markdown
        });
        if stale {
            let config = MessageRenderConfig::markdown(self.markdown).with_width(Some(width as usize));
            let layout =
                LayoutEngine::layout_messages(self.conversation.messages(), &self.theme, config);
            self.layout_cache = Some(LayoutCache {
                revision: self.revision,
                width,
                markdown: self.markdown,
                lines: layout.lines,
            });
        }
        self.layout_cache
            .as_ref()
            .map(|cache| cache.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn scroll_up(&mut self, lines: usize) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll_offset;
            self.auto_scroll = false;
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        if self.auto_scroll {
            return;
        }
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        if self.scroll_offset >= self.max_scroll_offset {
            self.scroll_to_bottom();
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_scroll_offset;
    }

    /// Offset to draw with, given the current number of lines and viewport
    /// height. Records the maximum for later scroll commands.
    pub fn effective_scroll_offset(&mut self, total_lines: usize, viewport: usize) -> usize {
        self.max_scroll_offset = total_lines.saturating_sub(viewport);
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll_offset;
        }
        self.scroll_offset.min(self.max_scroll_offset)
    }

    /// Input box height in text rows, excluding borders.
    pub fn input_height(&self, max_rows: u16) -> u16 {
        (self.input.lines().len() as u16).clamp(1, max_rows.max(1))
    }
}

fn new_input(theme: &Theme) -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_placeholder_text(INPUT_PLACEHOLDER);
    input.set_style(theme.input_text_style);
    input.set_cursor_line_style(Style::default());
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::FALLBACK_REPLY;
    use crate::utils::test_utils::create_test_app;

    #[test]
    fn new_app_greets_with_endpoint() {
        let app = create_test_app();
        let first = app.messages().next().expect("greeting");
        assert!(first.is_app());
        assert!(first.content.contains("127.0.0.1:8000/chat"));
    }

    #[test]
    fn blank_input_is_not_sent_and_is_kept() {
        let mut app = create_test_app();
        app.input.insert_str("   ");
        let before = app.conversation.messages().len();

        assert!(app.submit_input().is_none());
        assert_eq!(app.conversation.messages().len(), before);
        assert_eq!(app.input_text(), "   ");
    }

    #[test]
    fn submitting_text_clears_input_and_returns_request() {
        let mut app = create_test_app();
        app.input.insert_str("Weekend in Porto");

        let request = app.submit_input().expect("request");
        assert_eq!(request.body.message, "Weekend in Porto");
        assert_eq!(app.input_text(), "");
        assert_eq!(
            app.conversation.messages().back(),
            Some(&Message::user("Weekend in Porto"))
        );
    }

    #[test]
    fn input_is_kept_while_waiting_for_reply() {
        let mut app = create_test_app();
        app.input.insert_str("first");
        let request = app.submit_input().expect("request");

        app.input.insert_str("second");
        assert!(app.submit_input().is_none());
        assert_eq!(app.input_text(), "second");

        app.apply_reply(request.id, Err(ChatError::Status { status: 500, body: String::new() }));
        assert_eq!(
            app.conversation.messages().back(),
            Some(&Message::app_error(FALLBACK_REPLY))
        );
        assert!(app.submit_input().is_some());
    }

    #[test]
    fn slash_commands_do_not_reach_the_endpoint() {
        let mut app = create_test_app();
        app.input.insert_str("/markdown");

        assert!(app.submit_input().is_none());
        assert!(!app.markdown);
        assert_eq!(app.input_text(), "");
        assert!(!app.conversation.is_pending());
    }

    #[test]
    fn quit_command_sets_flag() {
        let mut app = create_test_app();
        app.input.insert_str("/quit");
        app.submit_input();
        assert!(app.should_quit);
    }

    #[test]
    fn transcript_lines_are_cached_until_transcript_changes() {
        let mut app = create_test_app();
        let first = app.transcript_lines(40).to_vec();
        assert_eq!(app.transcript_lines(40), first.as_slice());

        app.add_info("another notice");
        assert!(app.transcript_lines(40).len() > first.len());
    }

    #[test]
    fn scrolling_up_leaves_follow_mode_until_bottom() {
        let mut app = create_test_app();
        assert_eq!(app.effective_scroll_offset(50, 10), 40);

        app.scroll_up(5);
        assert!(!app.auto_scroll);
        assert_eq!(app.effective_scroll_offset(50, 10), 35);

        app.scroll_down(10);
        assert!(app.auto_scroll);
        assert_eq!(app.effective_scroll_offset(60, 10), 50);
    }
}
