use std::collections::VecDeque;

use ratatui::text::Line;

use super::markdown::{render_message, MessageRenderConfig};
use super::theme::Theme;
use crate::core::message::Message;

/// Result of a layout pass: every message rendered and wrapped, flattened
/// into one line stream.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// The single width-aware pipeline used by the renderer and scroll math.
    /// No further wrapping happens after this step.
    pub fn layout_messages(
        messages: &VecDeque<Message>,
        theme: &Theme,
        config: MessageRenderConfig,
    ) -> Layout {
        let lines = messages
            .iter()
            .flat_map(|msg| render_message(msg, theme, config))
            .collect();
        Layout { lines }
    }
}
