use crate::core::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows the input editor may grow to before it scrolls internally.
const MAX_INPUT_ROWS: u16 = 6;

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        area,
    );

    let input_height = app.input_height(MAX_INPUT_ROWS) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_messages(f, app, chunks[1]);
    render_input(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" ✈ DestinAI ", app.theme.header_accent_style),
        Span::styled(
            format!(
                "v{} • {} • Logging: {}",
                env!("CARGO_PKG_VERSION"),
                app.settings.endpoint,
                app.logging.get_status_string()
            ),
            app.theme.header_style,
        ),
    ];
    if app.conversation.is_pending() {
        spans.push(Span::styled(
            format!(" {}", pulse_symbol(app.pulse_start.elapsed().as_millis())),
            app.theme.pending_indicator_style,
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(app.theme.header_style),
        area,
    );
}

fn render_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let viewport = area.height as usize;
    let total = app.transcript_lines(area.width).len();
    let offset = app.effective_scroll_offset(total, viewport);
    let visible: Vec<Line<'static>> = app
        .transcript_lines(area.width)
        .iter()
        .skip(offset)
        .take(viewport)
        .cloned()
        .collect();
    f.render_widget(Paragraph::new(visible), area);
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.conversation.is_pending() {
        "Waiting for DestinAI… (Ctrl+C to quit)"
    } else {
        "Message (Enter to send, Alt+Enter for newline, /help for commands)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.input_border_style)
        .title(Span::styled(title, app.theme.input_title_style));
    app.input.set_block(block);
    f.render_widget(&app.input, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.conversation.status().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {status}"), app.theme.status_style)),
        area,
    );
}

/// Three-step pulse cycling twice a second.
pub(crate) fn pulse_symbol(elapsed_ms: u128) -> &'static str {
    let phase = (elapsed_ms % 1000) as f32 / 500.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}
