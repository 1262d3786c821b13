//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves the effective settings,
//! and dispatches to the interactive chat, the one-shot `say` command, or the
//! configuration subcommands.

pub mod say;

use std::error::Error;
use std::fs::File;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::say::run_say;
use crate::core::config::data::{path_display, ConfigKey};
use crate::core::config::{Config, Settings, SettingsOverrides};
use crate::ui::chat_loop::run_chat;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_DESCRIBE"),
    "\nbuilt: ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc: ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser, Debug)]
#[command(name = "destin", version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat front-end for the DestinAI trip planner")]
#[command(
    long_about = "destin is a full-screen terminal chat client for a DestinAI server. \
Type a message, press Enter, and the reply is rendered as Markdown in the conversation.\n\n\
Environment Variables:\n\
  DESTIN_ENDPOINT   Chat endpoint URL (overrides the config file)\n\
  DESTIN_CONFIG     Path to an alternate config file\n\
  RUST_LOG          Filter for --debug-log output\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Up/Down/Mouse     Scroll through the conversation\n\
  Ctrl+L            Clear the input\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show commands and key bindings\n\
  /save [file]      Save the conversation to a text file\n\
  /log [file]       Enable logging, or pause/resume it"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat endpoint URL
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Color theme (dark, light, monochrome)
    #[arg(short = 't', long, global = true)]
    pub theme: Option<String>,

    /// Show replies as plain text instead of rendering Markdown
    #[arg(long, global = true)]
    pub plain: bool,

    /// Send each message without the earlier conversation
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Write diagnostic logs to the given file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// Show the config file location and effective settings
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key (endpoint, theme, markdown, send-history, request-timeout)
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            endpoint: self.endpoint.clone(),
            theme: self.theme.clone(),
            plain: self.plain,
            no_history: self.no_history,
            log_file: self.log.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if let Some(path) = args.debug_log.as_deref() {
        init_debug_log(path)?;
    }
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

fn init_debug_log(path: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("destin=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = args.overrides();
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = resolve_settings(overrides)?;
            run_chat(settings).await
        }
        Commands::Say { prompt } => {
            let settings = resolve_settings(overrides)?;
            run_say(prompt, settings).await
        }
        Commands::Config => {
            let config = Config::load()?;
            println!("Config file: {}", path_display(Config::get_config_path()?));
            config.print_all();
            println!();
            Settings::from_environment(&config, overrides)?.print_effective();
            Ok(())
        }
        Commands::Set { key, value } => {
            let key = parse_key(&key)?;
            let mut config = Config::load()?;
            config.set_value(key, &value)?;
            config.save()?;
            println!("✅ Set {} to: {}", key.as_str(), value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key(&key)?;
            let mut config = Config::load()?;
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
    }
}

fn resolve_settings(overrides: SettingsOverrides) -> Result<Settings, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(Settings::from_environment(&config, overrides)?)
}

fn parse_key(name: &str) -> Result<ConfigKey, String> {
    ConfigKey::parse(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
        format!("Unknown config key: {name} (expected one of: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["destin"]).expect("parse");
        assert!(args.command.is_none());
        assert!(!args.plain);
    }

    #[test]
    fn say_collects_prompt_words() {
        let args =
            Args::try_parse_from(["destin", "say", "two", "days", "in", "-Rome-"]).expect("parse");
        assert_eq!(
            args.command,
            Some(Commands::Say {
                prompt: vec!["two".into(), "days".into(), "in".into(), "-Rome-".into()]
            })
        );
    }

    #[test]
    fn say_requires_a_prompt() {
        assert!(Args::try_parse_from(["destin", "say"]).is_err());
    }

    #[test]
    fn global_flags_become_overrides() {
        let args = Args::try_parse_from([
            "destin",
            "chat",
            "--endpoint",
            "http://localhost:9000/chat",
            "--plain",
            "--no-history",
            "-l",
            "trip.log",
        ])
        .expect("parse");
        let overrides = args.overrides();
        assert_eq!(overrides.endpoint.as_deref(), Some("http://localhost:9000/chat"));
        assert!(overrides.plain);
        assert!(overrides.no_history);
        assert_eq!(overrides.log_file.as_deref(), Some("trip.log"));
    }

    #[test]
    fn set_takes_key_and_value() {
        let args = Args::try_parse_from(["destin", "set", "theme", "light"]).expect("parse");
        assert_eq!(
            args.command,
            Some(Commands::Set {
                key: "theme".into(),
                value: "light".into()
            })
        );
    }

    #[test]
    fn unknown_keys_list_the_known_ones() {
        let err = parse_key("model").expect_err("unknown key");
        assert!(err.contains("send-history"));
        assert_eq!(parse_key("Request-Timeout"), Ok(ConfigKey::RequestTimeout));
    }
}
