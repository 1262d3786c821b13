use super::data::{ConfigKey, DEFAULT_ENDPOINT};
use super::*;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn missing_config_file_loads_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::load_from_path(&dir.path().join("config.toml")).expect("load");
    assert_eq!(config, Config::default());
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        endpoint: Some("http://localhost:9000/chat".to_string()),
        theme: Some("light".to_string()),
        markdown: Some(false),
        send_history: None,
        request_timeout_secs: Some(30),
    };
    config.save_to_path(&path).expect("save");

    assert_eq!(Config::load_from_path(&path).expect("load"), config);
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "endpoint = [").expect("write");

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn config_keys_parse_case_insensitively() {
    assert_eq!(ConfigKey::parse("Endpoint"), Some(ConfigKey::Endpoint));
    assert_eq!(ConfigKey::parse("send-history"), Some(ConfigKey::SendHistory));
    assert_eq!(ConfigKey::parse("model"), None);
}

#[test]
fn set_value_validates_input() {
    let mut config = Config::default();

    assert!(config.set_value(ConfigKey::Endpoint, "ftp://example.com").is_err());
    assert!(config.set_value(ConfigKey::Endpoint, "not a url").is_err());
    config
        .set_value(ConfigKey::Endpoint, "https://destin.example.com/chat")
        .expect("endpoint");
    assert_eq!(
        config.endpoint.as_deref(),
        Some("https://destin.example.com/chat")
    );

    assert!(config.set_value(ConfigKey::Theme, "solarized").is_err());
    config.set_value(ConfigKey::Theme, "Light").expect("theme");
    assert_eq!(config.theme.as_deref(), Some("light"));

    config.set_value(ConfigKey::Markdown, "off").expect("markdown");
    assert_eq!(config.markdown, Some(false));
    assert!(config.set_value(ConfigKey::Markdown, "maybe").is_err());

    assert!(config.set_value(ConfigKey::RequestTimeout, "0").is_err());
    config.set_value(ConfigKey::RequestTimeout, "45").expect("timeout");
    assert_eq!(config.request_timeout_secs, Some(45));

    config.unset_value(ConfigKey::RequestTimeout);
    assert_eq!(config.request_timeout_secs, None);
}

#[test]
fn settings_default_to_local_endpoint_with_markdown_and_history() {
    let settings =
        Settings::resolve(&Config::default(), SettingsOverrides::default(), None).expect("resolve");
    assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.theme, "dark");
    assert!(settings.markdown);
    assert!(settings.send_history);
    assert_eq!(settings.request_timeout, None);
}

#[test]
fn settings_precedence_is_flag_then_env_then_file() {
    let config = Config {
        endpoint: Some("http://file.example/chat".to_string()),
        request_timeout_secs: Some(10),
        ..Config::default()
    };

    let from_file =
        Settings::resolve(&config, SettingsOverrides::default(), None).expect("resolve");
    assert_eq!(from_file.endpoint, "http://file.example/chat");
    assert_eq!(from_file.request_timeout, Some(Duration::from_secs(10)));

    let from_env = Settings::resolve(
        &config,
        SettingsOverrides::default(),
        Some("http://env.example/chat".to_string()),
    )
    .expect("resolve");
    assert_eq!(from_env.endpoint, "http://env.example/chat");

    let from_flag = Settings::resolve(
        &config,
        SettingsOverrides {
            endpoint: Some("http://flag.example/chat".to_string()),
            plain: true,
            no_history: true,
            ..SettingsOverrides::default()
        },
        Some("http://env.example/chat".to_string()),
    )
    .expect("resolve");
    assert_eq!(from_flag.endpoint, "http://flag.example/chat");
    assert!(!from_flag.markdown);
    assert!(!from_flag.send_history);
}

#[test]
fn settings_reject_invalid_endpoint() {
    let overrides = SettingsOverrides {
        endpoint: Some("localhost:8000".to_string()),
        ..SettingsOverrides::default()
    };
    assert!(Settings::resolve(&Config::default(), overrides, None).is_err());
}

#[test]
fn settings_reject_unknown_theme_from_flag_or_file() {
    let overrides = SettingsOverrides {
        theme: Some("dracula".to_string()),
        ..SettingsOverrides::default()
    };
    let err = Settings::resolve(&Config::default(), overrides, None).expect_err("flag theme");
    assert!(err.contains("Available themes: dark, light, monochrome"));

    let config = Config {
        theme: Some("dracula".to_string()),
        ..Config::default()
    };
    assert!(Settings::resolve(&config, SettingsOverrides::default(), None).is_err());

    let config = Config {
        theme: Some("light".to_string()),
        ..Config::default()
    };
    let settings =
        Settings::resolve(&config, SettingsOverrides::default(), None).expect("known theme");
    assert_eq!(settings.theme, "light");
}
