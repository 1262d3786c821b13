//! Turns transcript messages into styled, width-wrapped terminal lines.
//!
//! Replies are parsed with pulldown-cmark and mapped onto the theme's
//! markdown styles; user and app messages render as plain text. Every
//! message ends with one blank separator line.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, TranscriptRole};
use crate::ui::theme::Theme;
use crate::ui::wrap::wrap_spans_to_width;

pub const USER_PREFIX: &str = "You: ";
const USER_CONTINUATION_INDENT: &str = "     ";
const QUOTE_PREFIX: &str = "│ ";
const CODE_INDENT: &str = "  ";
const MAX_RULE_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageRenderConfig {
    pub markdown: bool,
    pub width: Option<usize>,
}

impl MessageRenderConfig {
    pub fn markdown(markdown: bool) -> Self {
        Self {
            markdown,
            width: None,
        }
    }

    pub fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }
}

pub fn render_message(
    msg: &Message,
    theme: &Theme,
    config: MessageRenderConfig,
) -> Vec<Line<'static>> {
    let mut lines = if msg.is_assistant() && config.markdown {
        MarkdownRenderer::new(&msg.content, theme, config.width).render()
    } else {
        render_plain(msg, theme, config.width)
    };
    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    lines.push(Line::default());
    lines
}

fn text_style(role: TranscriptRole, theme: &Theme) -> Style {
    match role {
        TranscriptRole::User => theme.user_text_style,
        TranscriptRole::Assistant => theme.assistant_text_style,
        TranscriptRole::AppInfo => theme.app_info_style,
        TranscriptRole::AppError => theme.app_error_style,
    }
}

fn render_plain(msg: &Message, theme: &Theme, width: Option<usize>) -> Vec<Line<'static>> {
    let style = text_style(msg.role, theme);
    let (first_prefix, continuation) = if msg.is_user() {
        (
            Span::styled(USER_PREFIX, theme.user_prefix_style),
            Span::raw(USER_CONTINUATION_INDENT),
        )
    } else {
        (Span::raw(""), Span::raw(""))
    };
    let available = width.map(|w| w.saturating_sub(first_prefix.width()).max(1));

    let mut lines = Vec::new();
    for source_line in msg.content.split('\n') {
        let spans = if source_line.is_empty() {
            Vec::new()
        } else {
            vec![Span::styled(source_line.to_string(), style)]
        };
        for wrapped in wrap_optional(&spans, available) {
            let prefix = if lines.is_empty() {
                first_prefix.clone()
            } else {
                continuation.clone()
            };
            lines.push(prefixed(vec![prefix], wrapped));
        }
    }
    lines
}

fn wrap_optional(spans: &[Span<'static>], width: Option<usize>) -> Vec<Vec<Span<'static>>> {
    match width {
        Some(width) => wrap_spans_to_width(spans, width),
        None => vec![spans.to_vec()],
    }
}

fn prefixed(prefix: Vec<Span<'static>>, body: Vec<Span<'static>>) -> Line<'static> {
    let spans: Vec<Span<'static>> = prefix
        .into_iter()
        .chain(body)
        .filter(|span| !span.content.is_empty())
        .collect();
    Line::from(spans)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct PendingLink {
    url: String,
    text: String,
}

struct MarkdownRenderer<'a> {
    content: &'a str,
    theme: &'a Theme,
    width: Option<usize>,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    /// Marker width of every open list item, outermost first.
    item_indents: Vec<usize>,
    pending_marker: Option<String>,
    quote_depth: usize,
    code_block: Option<Vec<String>>,
    links: Vec<PendingLink>,
    table_row: Option<Vec<String>>,
    table_cell: String,
    in_table_head: bool,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(content: &'a str, theme: &'a Theme, width: Option<usize>) -> Self {
        Self {
            content,
            theme,
            width,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: vec![theme.assistant_text_style],
            list_stack: Vec::new(),
            item_indents: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            code_block: None,
            links: Vec::new(),
            table_row: None,
            table_cell: String::new(),
            in_table_head: false,
        }
    }

    fn render(mut self) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(self.content, options);

        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if let Some(block) = self.code_block.as_mut() {
                        block.push(text.to_string());
                    } else {
                        self.push_text(&text, self.current_style());
                    }
                }
                Event::Code(code) => self.push_text(&code, self.theme.md_inline_code_style),
                Event::Html(html) | Event::InlineHtml(html) => {
                    self.push_text(html.trim_end_matches('\n'), self.current_style())
                }
                Event::SoftBreak | Event::HardBreak => self.flush_current_spans(),
                Event::Rule => {
                    self.flush_current_spans();
                    let width = self
                        .width
                        .map(|w| w.saturating_sub(self.prefix_width()).min(MAX_RULE_WIDTH))
                        .unwrap_or(MAX_RULE_WIDTH);
                    self.current_spans
                        .push(Span::styled("─".repeat(width), self.theme.md_rule_style));
                    self.flush_current_spans();
                    self.push_empty_line();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_text(marker, self.current_style());
                }
                Event::FootnoteReference(label) => {
                    self.push_text(&format!("[^{label}]"), self.current_style())
                }
                _ => {}
            }
        }
        self.flush_current_spans();
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.flush_current_spans();
                let style = self.theme.md_heading_style;
                self.style_stack.push(style);
                let hashes = "#".repeat(level as usize);
                self.current_spans
                    .push(Span::styled(format!("{hashes} "), style));
            }
            Tag::BlockQuote(_) => {
                self.flush_current_spans();
                self.quote_depth += 1;
                self.style_stack.push(self.theme.md_quote_style);
            }
            Tag::CodeBlock(kind) => {
                self.flush_current_spans();
                if let CodeBlockKind::Fenced(lang) = kind {
                    let lang = lang.trim();
                    if !lang.is_empty() {
                        self.current_spans
                            .push(Span::styled(lang.to_string(), self.theme.md_rule_style));
                        self.flush_current_spans();
                    }
                }
                self.code_block = Some(Vec::new());
            }
            Tag::List(start) => {
                self.flush_current_spans();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush_current_spans();
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let current = *n;
                        *n += 1;
                        format!("{current}. ")
                    }
                    _ => "• ".to_string(),
                };
                self.item_indents.push(marker.width());
                self.pending_marker = Some(marker);
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.style_stack.push(self.theme.md_link_style);
                self.links.push(PendingLink {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Table(_) => {
                self.flush_current_spans();
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.table_row = Some(Vec::new());
            }
            Tag::TableRow => self.table_row = Some(Vec::new()),
            Tag::TableCell => self.table_cell.clear(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush_current_spans();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush_current_spans();
                self.style_stack.pop();
                self.push_empty_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_current_spans();
                self.style_stack.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(_) => {
                self.flush_current_spans();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Item => {
                self.flush_current_spans();
                self.item_indents.pop();
                self.pending_marker = None;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link | TagEnd::Image => {
                self.style_stack.pop();
                if let Some(link) = self.links.pop() {
                    if !link.url.is_empty() && link.url != link.text {
                        let suffix = format!(" ({})", link.url);
                        if self.table_row.is_some() {
                            self.table_cell.push_str(&suffix);
                        } else {
                            self.current_spans
                                .push(Span::styled(suffix, self.theme.md_rule_style));
                        }
                    }
                }
            }
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.table_cell);
                if let Some(row) = self.table_row.as_mut() {
                    row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                self.finish_table_row();
                self.in_table_head = false;
            }
            TagEnd::TableRow => self.finish_table_row(),
            TagEnd::Table => self.push_empty_line(),
            _ => {}
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or(self.theme.assistant_text_style)
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(link) = self.links.last_mut() {
            link.text.push_str(text);
        }
        if self.table_row.is_some() {
            self.table_cell.push_str(text);
            return;
        }
        self.current_spans
            .push(Span::styled(text.replace('\t', "    "), style));
    }

    fn prefix_width(&self) -> usize {
        self.quote_depth * QUOTE_PREFIX.width() + self.item_indents.iter().sum::<usize>()
    }

    /// Prefix for the first line of the current block and for its
    /// continuation lines.
    fn line_prefixes(&mut self) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
        let quote = Span::styled(QUOTE_PREFIX.repeat(self.quote_depth), self.theme.md_quote_style);
        let total_indent: usize = self.item_indents.iter().sum();
        let continuation = vec![quote.clone(), Span::raw(" ".repeat(total_indent))];

        let first = match self.pending_marker.take() {
            Some(marker) => {
                let outer = total_indent.saturating_sub(marker.width());
                vec![
                    quote,
                    Span::raw(" ".repeat(outer)),
                    Span::styled(marker, self.current_style()),
                ]
            }
            None => continuation.clone(),
        };
        (first, continuation)
    }

    fn flush_current_spans(&mut self) {
        if self.current_spans.is_empty() && self.pending_marker.is_none() {
            return;
        }
        let spans = std::mem::take(&mut self.current_spans);
        self.emit_wrapped(spans);
    }

    fn emit_wrapped(&mut self, spans: Vec<Span<'static>>) {
        let available = self
            .width
            .map(|w| w.saturating_sub(self.prefix_width()).max(1));
        let (first, continuation) = self.line_prefixes();
        for (index, wrapped) in wrap_optional(&spans, available).into_iter().enumerate() {
            let prefix = if index == 0 {
                first.clone()
            } else {
                continuation.clone()
            };
            self.lines.push(prefixed(prefix, wrapped));
        }
    }

    fn push_empty_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.spans.is_empty()) || self.lines.is_empty() {
            return;
        }
        self.lines.push(Line::default());
    }

    fn finish_code_block(&mut self) {
        let Some(chunks) = self.code_block.take() else {
            return;
        };
        let code = chunks.concat();
        let style = self.theme.md_codeblock_style;
        for line in code.trim_end_matches('\n').split('\n') {
            let spans = vec![
                Span::raw(CODE_INDENT),
                Span::styled(line.replace('\t', "    "), style),
            ];
            self.emit_wrapped(spans);
        }
        if self.list_stack.is_empty() {
            self.push_empty_line();
        }
    }

    fn finish_table_row(&mut self) {
        let Some(cells) = self.table_row.take() else {
            return;
        };
        if cells.is_empty() {
            return;
        }
        let style = if self.in_table_head {
            self.current_style().add_modifier(Modifier::BOLD)
        } else {
            self.current_style()
        };
        let separator = Span::styled(" │ ", self.theme.md_rule_style);
        let mut spans = Vec::with_capacity(cells.len() * 2);
        for (index, cell) in cells.into_iter().enumerate() {
            if index > 0 {
                spans.push(separator.clone());
            }
            spans.push(Span::styled(cell, style));
        }
        let header_width = spans.iter().map(|span| span.width()).sum::<usize>();
        self.emit_wrapped(spans);
        if self.in_table_head {
            let width = self
                .width
                .map(|w| header_width.min(w.saturating_sub(self.prefix_width())))
                .unwrap_or(header_width);
            self.emit_wrapped(vec![Span::styled("─".repeat(width), self.theme.md_rule_style)]);
        }
    }
}
