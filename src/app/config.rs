//! Environment-driven configuration.
//!
//! Both binaries read their settings from process environment variables, after
//! loading an optional `.env` file from the working directory.
//!
//! | Variable | Binary | Default |
//! |---|---|---|
//! | `PORT` | server | `5000` |
//! | `AZURE_ACCESS_TOKEN` | server | unset |
//! | `AZURE_MANAGEMENT_ENDPOINT` | server | `https://management.azure.com` |
//! | `AZTAGS_FETCH_CONCURRENCY` | server | `1` |
//! | `AZTAGS_API_URL` | viewer | `http://127.0.0.1:5000` |

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::app::azure::{DEFAULT_FETCH_CONCURRENCY, DEFAULT_MANAGEMENT_ENDPOINT};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

pub const ENV_PORT: &str = "PORT";
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";
pub const ENV_MANAGEMENT_ENDPOINT: &str = "AZURE_MANAGEMENT_ENDPOINT";
pub const ENV_FETCH_CONCURRENCY: &str = "AZTAGS_FETCH_CONCURRENCY";
pub const ENV_API_URL: &str = "AZTAGS_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for `aztags-server`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Bearer token forwarded to the management API
    pub access_token: Option<String>,
    pub management_endpoint: String,
    /// Sibling fetches allowed in flight per hierarchy level
    pub fetch_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            access_token: None,
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv().log();
        let config = Self::from_lookup(|name| std::env::var(name).ok())?;
        if config.access_token.is_none() {
            warn!("{} is not set; upstream calls will be rejected", ENV_ACCESS_TOKEN);
        }
        Ok(config)
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_PORT) {
            config.port = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: ENV_PORT,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        config.access_token = get(ENV_ACCESS_TOKEN).map(|t| t.trim().to_string());

        if let Some(value) = get(ENV_MANAGEMENT_ENDPOINT) {
            config.management_endpoint = parse_http_url(ENV_MANAGEMENT_ENDPOINT, &value)?;
        }

        if let Some(value) = get(ENV_FETCH_CONCURRENCY) {
            config.fetch_concurrency = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: ENV_FETCH_CONCURRENCY,
                        value,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: ENV_FETCH_CONCURRENCY,
                        value: value.clone(),
                        reason: e.to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    /// Listen on every interface, like a typical development server.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Settings for the `aztags` viewer
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Base URL of a running `aztags-server`
    pub api_url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv().log();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            Some(value) => Ok(Self {
                api_url: parse_http_url(ENV_API_URL, &value)?,
            }),
            None => Ok(Self::default()),
        }
    }
}

fn parse_http_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// What happened when looking for a `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

impl DotenvStatus {
    pub fn log(&self) {
        match self {
            DotenvStatus::Loaded(path) => debug!("Loaded environment from {:?}", path),
            DotenvStatus::NotFound => {}
            DotenvStatus::Unreadable(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
    }
}

/// Load `.env` from the working directory (or a parent) without overriding
/// variables already set. Binaries call this before logging starts so a
/// `RUST_LOG` from the file takes effect; log the status once a subscriber exists.
pub fn load_dotenv() -> DotenvStatus {
    dotenv_status(dotenvy::dotenv())
}

pub fn load_env_file(path: &Path) -> DotenvStatus {
    dotenv_status(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn dotenv_status(result: dotenvy::Result<PathBuf>) -> DotenvStatus {
    match result {
        Ok(path) => DotenvStatus::Loaded(path),
        Err(e) if e.not_found() => DotenvStatus::NotFound,
        Err(e) => DotenvStatus::Unreadable(e.to_string()),
    }
}
