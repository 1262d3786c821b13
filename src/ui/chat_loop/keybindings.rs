//! Maps key presses to chat actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    InsertNewline,
    ClearInput,
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    /// Forward the key to the input editor.
    Edit,
}

pub fn action_for_key(key: &KeyEvent, input_is_empty: bool) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('l') if ctrl => KeyAction::ClearInput,
        // Some terminals report Ctrl+J for a modified Enter.
        KeyCode::Char('j') if ctrl => KeyAction::InsertNewline,
        KeyCode::Enter if alt || shift => KeyAction::InsertNewline,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Esc if input_is_empty => KeyAction::Quit,
        KeyCode::Up => KeyAction::ScrollUp,
        KeyCode::Down => KeyAction::ScrollDown,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Home if ctrl || input_is_empty => KeyAction::ScrollTop,
        KeyCode::End if ctrl || input_is_empty => KeyAction::ScrollBottom,
        _ => KeyAction::Edit,
    }
}
