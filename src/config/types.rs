//! The configuration structs used to build the AppConfig, and their impls.
use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::SecretString;
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult, ENV_PREFIX};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub list_config: ListConfig,
    #[serde(default)]
    pub cors_config: CorsConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Everything needed to talk to the upstream list-management API.
#[derive(Deserialize, Clone, Debug)]
pub struct ListConfig {
    pub base_url: String,
    pub list_id: String,
    pub api_key: SecretString,
    #[serde(default)]
    pub api: ListApi,
    pub timeout_millis: u64,
}

/// Which upstream contract to speak.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListApi {
    /// `POST /api/v2/list/{list_id}/subscribe` with the key in the body.
    #[default]
    V2,
    /// `POST /api/profile-subscription-bulk-create-jobs/` with the key in a header.
    Revisioned { revision: String },
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    /// `["*"]` allows every origin.
    pub allowed_origins: Vec<String>,
}

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    /// Layers `base.toml`, `{environment}.toml` and the `APP_` environment.
    pub fn figment(config_dir: impl AsRef<Path>, environment: Environment) -> ConfigResult<Figment> {
        let config_dir = config_dir.as_ref();
        let base_file = config_dir.join("base.toml");
        // A missing base file is a deployment mistake, figment would silently skip it.
        std::fs::metadata(&base_file)?;
        let env_file = config_dir.join(format!("{}.toml", environment.as_ref().to_lowercase()));

        let figment = Figment::new()
            .merge(Toml::file(base_file))
            .merge(Toml::file(env_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment)
    }

    pub fn load(config_dir: impl AsRef<Path>, environment: Environment) -> ConfigResult<Self> {
        let config = Self::figment(config_dir, environment)?.extract::<AppConfig>()?;
        config.list_config.url()?;
        Ok(config)
    }
}

impl ListConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }

    pub fn url(&self) -> ConfigResult<reqwest::Url> {
        reqwest::Url::parse(&self.base_url).map_err(|er| ConfigError::InvalidBaseUrl(er.to_string()))
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
