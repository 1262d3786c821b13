use super::usage_status;
use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandResult};
use crate::core::app::App;

const KEY_HELP: &[(&str, &str)] = &[
    ("Enter", "Send the message"),
    ("Alt+Enter", "Insert a newline"),
    ("Up/Down, PgUp/PgDn", "Scroll the conversation"),
    ("Home/End", "Jump to the top or bottom of the conversation"),
    ("Ctrl+L", "Clear the input"),
    ("Esc", "Quit when the input is empty"),
    ("Ctrl+C", "Quit"),
];

pub(crate) fn help_text() -> String {
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<18} {}\n", command.usage, command.help));
    }
    help.push_str("\nKeys:\n");
    for (keys, action) in KEY_HELP {
        help.push_str(&format!("  {keys:<18} {action}\n"));
    }
    help.trim_end().to_string()
}

pub(crate) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.add_info(help_text());
    app.scroll_to_bottom();
    CommandResult::Continue
}

pub(crate) fn handle_clear(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args_len() > 0 {
        return usage_status(app, "Usage: /clear");
    }
    app.clear_conversation();
    app.conversation.set_status("Started a new conversation");
    CommandResult::Continue
}

pub(crate) fn handle_markdown(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let enabled = match invocation.arg(0).map(str::to_ascii_lowercase).as_deref() {
        None => !app.markdown,
        Some("on") => true,
        Some("off") => false,
        Some(_) => return usage_status(app, "Usage: /markdown [on|off]"),
    };
    app.set_markdown(enabled);
    app.conversation.set_status(if enabled {
        "Markdown rendering enabled"
    } else {
        "Markdown rendering disabled"
    });
    CommandResult::Continue
}

pub(crate) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
