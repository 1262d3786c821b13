use crate::core::app::App;
use crate::core::config::{Config, Settings};

pub fn create_test_settings() -> Settings {
    Settings::resolve(&Config::default(), Default::default(), None).expect("default settings")
}

pub fn create_test_app() -> App {
    App::new(create_test_settings()).expect("test app")
}
