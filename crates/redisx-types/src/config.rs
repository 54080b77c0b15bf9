//! Configuration loading for redisx.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/redisx/config.toml` (or the
//! platform equivalent).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Cluster connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Connect through the cluster-aware client instead of a single node.
    #[serde(default)]
    pub enabled: bool,

    /// Seed nodes (`host:port` or `redis://host:port`).
    /// When empty, `host:port` from the top-level settings is the only seed.
    #[serde(default)]
    pub nodes: Vec<String>,

    /// Allow read-only commands to be served by replicas.
    #[serde(default)]
    pub read_from_replicas: bool,
}

/// Main client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Store host
    #[serde(default = "default_host")]
    pub host: String,

    /// Store port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logical database (single node only)
    #[serde(default)]
    pub db: i64,

    /// ACL username
    #[serde(default)]
    pub username: Option<String>,

    /// Password (prefer REDISX_PASSWORD over writing it to a file)
    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub cluster: ClusterSettings,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            username: None,
            password: None,
            cluster: ClusterSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/redisx/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (REDISX_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let default_config_path = default_config_dir().join("config");

        let mut builder = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port() as i64)?
            .set_default("db", 0_i64)?
            .set_default("log_level", default_log_level())?
            .set_default("cluster.enabled", false)?
            .set_default("cluster.read_from_replicas", false)?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: REDISX_HOST, REDISX_LOG_LEVEL, REDISX_CLUSTER__NODES=a:1,b:2
        builder = builder.add_source(
            Environment::with_prefix("REDISX")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cluster.nodes")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Config("port must be > 0".to_string()));
        }
        if self.db < 0 {
            return Err(ConfigError::Config(format!("db must be >= 0, got {}", self.db)));
        }
        if self.cluster.enabled && self.db != 0 {
            return Err(ConfigError::Config(
                "cluster mode only supports db 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Single-node connection URL. Credentials are never included.
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// Cluster seed URLs, falling back to `host:port`.
    pub fn cluster_nodes(&self) -> Vec<String> {
        if self.cluster.nodes.is_empty() {
            return vec![format!("redis://{}:{}", self.host, self.port)];
        }
        self.cluster
            .nodes
            .iter()
            .map(|node| {
                if node.contains("://") {
                    node.clone()
                } else {
                    format!("redis://{}", node)
                }
            })
            .collect()
    }

    /// Copy with the password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.password.is_some() {
            copy.password = Some("********".to_string());
        }
        copy
    }
}

/// Directory holding the default config file.
pub fn default_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "redisx")
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
