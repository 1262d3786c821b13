//! The interactive session: terminal setup, the event loop, and request
//! dispatch.

mod keybindings;
mod lifecycle;

pub use keybindings::{action_for_key, KeyAction};

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::app::App;
use crate::core::chat_client::{ChatService, HttpTransport, ReplyEnvelope};
use crate::core::config::Settings;
use crate::ui::renderer::ui;
use lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

const FRAME_DURATION: Duration = Duration::from_millis(1000 / 30);
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const WHEEL_LINES: usize = 3;

/// Rows outside the message list: header, status line, input borders.
const CHROME_ROWS: u16 = 4;

pub async fn run_chat(settings: Settings) -> Result<(), Box<dyn Error>> {
    let transport = HttpTransport::new(settings.endpoint.clone(), settings.request_timeout)?;
    let mut app = App::new(settings)?;
    let (service, mut replies) = ChatService::new(Arc::new(transport));
    let cancel_token = CancellationToken::new();

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader = tokio::spawn(async move {
        loop {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                },
                Ok(false) => tokio::task::yield_now().await,
                Err(_) => break,
            }
        }
    });

    info!(endpoint = %app.settings.endpoint, "chat session started");
    let result = run_loop(
        &mut app,
        &mut terminal,
        &service,
        &mut replies,
        &mut event_rx,
        &cancel_token,
    )
    .await;

    cancel_token.cancel();
    event_reader.abort();
    restore_terminal(&mut terminal)?;
    info!("chat session ended");
    result
}

async fn run_loop(
    app: &mut App,
    terminal: &mut ChatTerminal,
    service: &ChatService,
    replies: &mut mpsc::UnboundedReceiver<ReplyEnvelope>,
    events: &mut mpsc::UnboundedReceiver<Event>,
    cancel_token: &CancellationToken,
) -> Result<(), Box<dyn Error>> {
    let mut request_redraw = true;
    let mut last_draw = Instant::now();

    loop {
        if app.should_quit {
            return Ok(());
        }

        let animating = app.conversation.is_pending() && last_draw.elapsed() >= FRAME_DURATION;
        if request_redraw || animating {
            terminal.draw(|f| ui(f, app))?;
            last_draw = Instant::now();
            request_redraw = false;
        }

        tokio::select! {
            Some((id, result)) = replies.recv() => {
                debug!(request_id = id, ok = result.is_ok(), "reply received");
                app.apply_reply(id, result);
                request_redraw = true;
            }
            Some(ev) = events.recv() => {
                let page = terminal
                    .size()
                    .map(|size| size.height.saturating_sub(app.input_height(6) + CHROME_ROWS))
                    .unwrap_or(1)
                    .max(1) as usize;
                handle_event(app, ev, page, service, cancel_token);
                request_redraw = true;
            }
            _ = tokio::time::sleep(FRAME_DURATION) => {}
        }
    }
}

/// Apply one terminal event to the app, dispatching a request when the input
/// was submitted.
pub fn handle_event(
    app: &mut App,
    ev: Event,
    page: usize,
    service: &ChatService,
    cancel_token: &CancellationToken,
) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key(app, key, page, service, cancel_token);
        }
        Event::Paste(text) => {
            app.input.insert_str(text.replace("\r\n", "\n").replace('\r', "\n"));
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => app.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => app.scroll_down(WHEEL_LINES),
            _ => {}
        },
        _ => {}
    }
}

fn handle_key(
    app: &mut App,
    key: KeyEvent,
    page: usize,
    service: &ChatService,
    cancel_token: &CancellationToken,
) {
    let input_is_empty = app.input_text().is_empty();
    match action_for_key(&key, input_is_empty) {
        KeyAction::Submit => {
            if let Some(request) = app.submit_input() {
                debug!(request_id = request.id, "dispatching chat request");
                service.spawn_request(request, cancel_token.child_token());
            }
        }
        KeyAction::InsertNewline => app.input.insert_newline(),
        KeyAction::ClearInput => app.clear_input(),
        KeyAction::Quit => app.should_quit = true,
        KeyAction::ScrollUp => app.scroll_up(1),
        KeyAction::ScrollDown => app.scroll_down(1),
        KeyAction::PageUp => app.scroll_up(page),
        KeyAction::PageDown => app.scroll_down(page),
        KeyAction::ScrollTop => app.scroll_to_top(),
        KeyAction::ScrollBottom => app.scroll_to_bottom(),
        KeyAction::Edit => {
            app.input.input(key);
        }
    }
}
