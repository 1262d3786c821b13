use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/chat";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Chat endpoint URL (e.g., "http://127.0.0.1:8000/chat")
    pub endpoint: Option<String>,
    /// UI theme name ("dark", "light", "monochrome")
    pub theme: Option<String>,
    /// Render replies as markdown
    pub markdown: Option<bool>,
    /// Send prior turns along with each message
    pub send_history: Option<bool>,
    /// Abort requests that take longer than this many seconds
    pub request_timeout_secs: Option<u64>,
}

/// Keys accepted by `destin set` / `destin unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    Theme,
    Markdown,
    SendHistory,
    RequestTimeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::Endpoint,
        ConfigKey::Theme,
        ConfigKey::Markdown,
        ConfigKey::SendHistory,
        ConfigKey::RequestTimeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::Theme => "theme",
            ConfigKey::Markdown => "markdown",
            ConfigKey::SendHistory => "send-history",
            ConfigKey::RequestTimeout => "request-timeout",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl Config {
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            ConfigKey::Endpoint => {
                validate_endpoint(value)?;
                self.endpoint = Some(value.to_string());
            }
            ConfigKey::Theme => {
                if !crate::ui::theme::Theme::is_known(value) {
                    return Err(format!(
                        "Unknown theme '{value}'. Available themes: {}",
                        crate::ui::theme::THEME_NAMES.join(", ")
                    ));
                }
                self.theme = Some(value.to_ascii_lowercase());
            }
            ConfigKey::Markdown => self.markdown = Some(parse_toggle(value)?),
            ConfigKey::SendHistory => self.send_history = Some(parse_toggle(value)?),
            ConfigKey::RequestTimeout => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| format!("Expected a positive number of seconds, got '{value}'"))?;
                self.request_timeout_secs = Some(secs);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Endpoint => self.endpoint = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::Markdown => self.markdown = None,
            ConfigKey::SendHistory => self.send_history = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
        }
    }
}

/// Endpoints must be absolute http(s) URLs.
pub fn validate_endpoint(value: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(value).map_err(|e| format!("Invalid endpoint '{value}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "Invalid endpoint '{value}': unsupported scheme '{scheme}'"
        )),
    }
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("Expected on/off, got '{value}'")),
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
