use crate::core::config::data::Config;
use crate::core::config::resolve::Settings;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset)"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset)"),
        }
        match self.markdown.unwrap_or(true) {
            true => println!("  markdown: on"),
            false => println!("  markdown: off"),
        }
        match self.send_history.unwrap_or(true) {
            true => println!("  send-history: on"),
            false => println!("  send-history: off"),
        }
        match self.request_timeout_secs {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (none)"),
        }
    }
}

impl Settings {
    pub fn print_effective(&self) {
        println!("Effective settings:");
        println!("  endpoint: {}", self.endpoint);
        println!("  theme: {}", self.theme);
        println!("  markdown: {}", if self.markdown { "on" } else { "off" });
        println!(
            "  send-history: {}",
            if self.send_history { "on" } else { "off" }
        );
        match self.request_timeout {
            Some(timeout) => println!("  request-timeout: {}s", timeout.as_secs()),
            None => println!("  request-timeout: (none)"),
        }
    }
}
