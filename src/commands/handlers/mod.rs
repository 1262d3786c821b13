pub(super) mod core;
pub(super) mod io;

use crate::commands::CommandResult;
use crate::core::app::App;

pub(super) fn usage_status(app: &mut App, usage: &'static str) -> CommandResult {
    app.conversation.set_status(usage);
    CommandResult::Continue
}
