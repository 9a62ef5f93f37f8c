pub mod app_config;
pub mod migrations;

pub use app_config::AppConfig;
pub use migrations::run_migrations;
