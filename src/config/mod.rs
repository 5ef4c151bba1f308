//! Builds an `AppConfig` from layered config files and the environment.
//! `config/base.toml` is read first, then `config/{environment}.toml`, then every
//! `APP_`-prefixed environment variable, where `__` separates nested keys
//! (`APP_LIST_CONFIG__API_KEY` sets `list_config.api_key`).
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod types;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, CorsConfig, Environment, ListApi, ListConfig, NetConfig};

pub const ENV_PREFIX: &str = "APP_";
pub const ENV_SELECTOR: &str = "APP_ENVIRONMENT";

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var(ENV_SELECTOR)
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .unwrap_or_else(|er| panic!("Fatal Error: Parsing {ENV_SELECTOR}: {er}"));

        AppConfig::load(config_dir, environment)
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}
