pub mod data;
pub mod io;
pub mod printing;
pub mod resolve;

#[cfg(test)]
mod tests;

pub use data::Config;
pub use io::ConfigError;
pub use resolve::{Settings, SettingsOverrides};
