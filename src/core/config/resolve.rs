use std::time::Duration;

use crate::core::config::data::{validate_endpoint, Config, DEFAULT_ENDPOINT};
use crate::ui::theme::{Theme, THEME_NAMES};

/// Overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "DESTIN_ENDPOINT";

/// Command-line values that take precedence over the environment and the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub theme: Option<String>,
    pub plain: bool,
    pub no_history: bool,
    pub log_file: Option<String>,
}

/// The effective settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub theme: String,
    pub markdown: bool,
    pub send_history: bool,
    pub request_timeout: Option<Duration>,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn resolve(
        config: &Config,
        overrides: SettingsOverrides,
        env_endpoint: Option<String>,
    ) -> Result<Self, String> {
        let endpoint = overrides
            .endpoint
            .or(env_endpoint.filter(|value| !value.trim().is_empty()))
            .or_else(|| config.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_endpoint(&endpoint)?;

        let theme = overrides
            .theme
            .or_else(|| config.theme.clone())
            .unwrap_or_else(|| "dark".to_string());
        if !Theme::is_known(&theme) {
            return Err(format!(
                "Unknown theme '{theme}'. Available themes: {}",
                THEME_NAMES.join(", ")
            ));
        }

        Ok(Self {
            endpoint,
            theme,
            markdown: !overrides.plain && config.markdown.unwrap_or(true),
            send_history: !overrides.no_history && config.send_history.unwrap_or(true),
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
            log_file: overrides.log_file,
        })
    }

    pub fn from_environment(config: &Config, overrides: SettingsOverrides) -> Result<Self, String> {
        Self::resolve(config, overrides, std::env::var(ENDPOINT_ENV).ok())
    }
}
