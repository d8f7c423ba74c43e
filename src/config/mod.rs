//! Environment-backed configuration.
//!
//! `YOUTUBE_API_KEY` is required. Everything else has a default and can be
//! overridden with `VIDALIGN_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::DEFAULT_YOUTUBE_API_URL;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults. The API key is
/// redacted from `Debug` output.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `7860`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// YouTube Data API key.
    pub youtube_api_key: String,

    /// YouTube Data API base URL.
    pub youtube_api_url: String,

    /// Directory holding one sub-directory per ensemble model. Default: `./models`.
    pub models_dir: PathBuf,

    /// Use deterministic stub embedders instead of loading models.
    pub embedder_stub: bool,
}

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 7860;

/// Default model directory.
pub const DEFAULT_MODELS_DIR: &str = "./models";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
            youtube_api_key: String::new(),
            youtube_api_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            embedder_stub: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("youtube_api_key", &"<redacted>")
            .field("youtube_api_url", &self.youtube_api_url)
            .field("models_dir", &self.models_dir)
            .field("embedder_stub", &self.embedder_stub)
            .finish()
    }
}

impl Config {
    /// Env var holding the provider credential.
    pub const ENV_API_KEY: &'static str = "YOUTUBE_API_KEY";
    const ENV_PORT: &'static str = "VIDALIGN_PORT";
    const ENV_BIND_ADDR: &'static str = "VIDALIGN_BIND_ADDR";
    const ENV_API_URL: &'static str = "VIDALIGN_YOUTUBE_API_URL";
    const ENV_MODELS_DIR: &'static str = "VIDALIGN_MODELS_DIR";
    const ENV_EMBEDDER_STUB: &'static str = "VIDALIGN_EMBEDDER_STUB";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Fails with [`ConfigError::MissingEnvVar`] when `YOUTUBE_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let youtube_api_key = Self::parse_required_from_env(Self::ENV_API_KEY)?;
        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let youtube_api_url = Self::parse_string_from_env(Self::ENV_API_URL, defaults.youtube_api_url);
        let models_dir = Self::parse_path_from_env(Self::ENV_MODELS_DIR, defaults.models_dir);
        let embedder_stub = Self::parse_bool_from_env(Self::ENV_EMBEDDER_STUB, defaults.embedder_stub)?;

        Ok(Self {
            port,
            bind_addr,
            youtube_api_key,
            youtube_api_url,
            models_dir,
            embedder_stub,
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.youtube_api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }

        if self.embedder_stub {
            return Ok(());
        }

        if !self.models_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.models_dir.clone(),
            });
        }
        if !self.models_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.models_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_required_from_env(var_name: &'static str) -> Result<String, ConfigError> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnvVar { name: var_name })
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Ok(value) = env::var(name) else {
            return Ok(default);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name, value }),
        }
    }
}
