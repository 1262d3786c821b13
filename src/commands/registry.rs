use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
    }

    pub fn args_len(&self) -> usize {
        self.args.split_whitespace().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands and key bindings.",
        handler: super::handlers::core::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Start a new conversation.",
        handler: super::handlers::core::handle_clear,
    },
    Command {
        name: "save",
        usage: "/save [filename]",
        help: "Save the conversation (your itinerary) to a text file.",
        handler: super::handlers::io::handle_save,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Start logging to a file, or pause/resume the current log.",
        handler: super::handlers::io::handle_log,
    },
    Command {
        name: "markdown",
        usage: "/markdown [on|off]",
        help: "Toggle markdown rendering for replies.",
        handler: super::handlers::core::handle_markdown,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Exit the chat.",
        handler: super::handlers::core::handle_quit,
    },
];
