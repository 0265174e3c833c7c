//! Server configuration.
//!
//! Settings come from an optional JSON file, then environment overrides, then
//! command-line flags applied by the server binary. The shared token secret has
//! no default: a server without one refuses to start.

mod error;

pub use error::{ConfigError, ConfigResult};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "FLOWGRAPH_CONFIG";
/// Configuration file used when neither an argument nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/flowgraph.json";

const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";
const PORT_ENV: &str = "PORT";
const DATA_DIR_ENV: &str = "FLOWGRAPH_DATA_DIR";
const LOG_LEVEL_ENV: &str = "FLOWGRAPH_LOG_LEVEL";

/// Configuration for a flowgraph server instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directory holding the record collections and the identity file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Host the HTTP server binds to
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret used to sign and verify bearer tokens
    #[serde(default, skip_serializing)]
    pub token_secret: Option<String>,
    /// File name of the reference identity set inside `data_dir`
    #[serde(default = "default_identity_file")]
    pub identity_file: String,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_identity_file() -> String {
    "demoToken.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_host: default_bind_host(),
            port: default_port(),
            token_secret: None,
            identity_file: default_identity_file(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("data_dir", &self.data_dir)
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field(
                "token_secret",
                &self.token_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("identity_file", &self.identity_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ServerConfig {
    /// Create a configuration reading its data from `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = Some(secret.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Address handed to the HTTP server, e.g. `0.0.0.0:4000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// Full path of the reference identity file
    pub fn identity_path(&self) -> PathBuf {
        self.data_dir.join(&self.identity_file)
    }

    /// The configured token secret, or an error if none is set
    pub fn token_secret(&self) -> ConfigResult<&str> {
        match self.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(ConfigError::validation(format!(
                "token secret is required (set {} or token_secret)",
                TOKEN_SECRET_ENV
            ))),
        }
    }

    pub fn log_level_filter(&self) -> ConfigResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| {
            ConfigError::validation(format!("unknown log level '{}'", self.log_level))
        })
    }

    /// Validate the configuration before the server starts
    pub fn validate(&self) -> ConfigResult<()> {
        self.token_secret()?;
        if self.port == 0 {
            return Err(ConfigError::validation("port must be non-zero"));
        }
        if self.identity_file.is_empty() {
            return Err(ConfigError::validation("identity_file must not be empty"));
        }
        self.log_level_filter()?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(TOKEN_SECRET_ENV) {
            self.token_secret = Some(secret);
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
                name: PORT_ENV.to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        Ok(())
    }
}

/// Load the server configuration.
///
/// The file is taken from `path`, then `FLOWGRAPH_CONFIG`, then
/// `config/flowgraph.json`. A missing file yields the defaults; a file that
/// exists but does not parse is an error. Environment overrides are applied
/// on top in both cases. The result is not validated here.
pub fn load_server_config(path: Option<&Path>) -> ConfigResult<ServerConfig> {
    let config_path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = read_config_file(&config_path)?;
    config.apply_env_overrides()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> ConfigResult<ServerConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<ServerConfig>(&contents) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                log::error!("Failed to parse configuration {}: {}", path.display(), e);
                Err(e.into())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            Ok(ServerConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}
