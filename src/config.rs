use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::NatusferaError;

pub const DEFAULT_BASE_URL: &str = "https://natusfera.gbif.es";
pub const BASE_URL_ENV: &str = "NATUSFERA_API_URL";
const LOCAL_CONFIG: &str = "natusfera.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// The public server's certificate chain does not validate, so this is on by default.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("natusfera/{}", env!("CARGO_PKG_VERSION"))
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Explicit path, then `./natusfera.json`, then the per-user config file,
    /// then built-in defaults. `NATUSFERA_API_URL` overrides the base URL.
    pub fn resolve(path: Option<&str>) -> Result<ClientConfig, NatusferaError> {
        let config = match path {
            Some(path) => Self::load(Path::new(path))?,
            None => match Self::discover() {
                Some(found) => Self::load(&found)?,
                None => ClientConfig::default(),
            },
        };
        Ok(Self::apply_env(config, std::env::var(BASE_URL_ENV).ok()))
    }

    pub fn load(path: &Path) -> Result<ClientConfig, NatusferaError> {
        let content =
            fs::read_to_string(path).map_err(|_| NatusferaError::ConfigRead(path.to_path_buf()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<ClientConfig, NatusferaError> {
        serde_json::from_str(content).map_err(|err| NatusferaError::ConfigParse(err.to_string()))
    }

    pub fn apply_env(mut config: ClientConfig, base_url: Option<String>) -> ClientConfig {
        if let Some(url) = base_url {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }
        config
    }

    pub fn user_config_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.config_dir().join("natusfera").join("config.json"))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            return Some(local);
        }
        Self::user_config_path().filter(|path| path.exists())
    }
}
