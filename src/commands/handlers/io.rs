use std::path::Path;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::app::App;
use crate::utils::transcript;

pub(crate) fn default_save_filename() -> String {
    format!(
        "destin-itinerary-{}.txt",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

pub(crate) fn handle_save(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = if invocation.args.is_empty() {
        default_save_filename()
    } else {
        invocation.args.to_string()
    };

    match transcript::export(app.conversation.messages(), Path::new(&filename)) {
        Ok(count) => {
            tracing::info!(file = %filename, messages = count, "saved conversation");
            app.conversation
                .set_status(format!("Saved {count} messages to {filename}"));
        }
        Err(e) => app.conversation.set_status(format!("Save error: {e}")),
    }
    CommandResult::Continue
}

pub(crate) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let timestamp = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string();

    if invocation.args.is_empty() {
        let was_active = app.logging.is_active();
        match app
            .logging
            .toggle_logging(&format!("Logging paused at {timestamp}"))
        {
            Ok(message) => {
                if !was_active {
                    write_marker(app, &format!("Logging resumed at {timestamp}"));
                }
                app.conversation.set_status(message);
            }
            Err(e) => app.conversation.set_status(format!("Log error: {e}")),
        }
        return CommandResult::Continue;
    }

    match app.logging.set_log_file(invocation.args.to_string()) {
        Ok(message) => {
            write_marker(app, &format!("Logging started at {timestamp}"));
            app.conversation.set_status(message);
        }
        Err(e) => app.conversation.set_status(format!("Logfile error: {e}")),
    }
    CommandResult::Continue
}

fn write_marker(app: &App, text: &str) {
    if let Err(e) = app.logging.log_marker(text) {
        tracing::warn!(error = %e, "failed to write log marker");
    }
}
