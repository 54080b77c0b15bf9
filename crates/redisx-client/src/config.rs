//! Runtime connection parameters.

use secrecy::{ExposeSecret, SecretString};

use redisx_types::Settings;

use crate::error::ClientError;

/// Connection parameters handed to the transport constructors.
///
/// Built from loaded [`Settings`] or directly. The password is kept in a
/// [`SecretString`] and only exposed when the connection is opened.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    /// Seed nodes (`host:port` or `redis://host:port`) for cluster mode
    pub cluster_nodes: Vec<String>,
    pub read_from_replicas: bool,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            db: 0,
            username: None,
            password: None,
            cluster_nodes: Vec::new(),
            read_from_replicas: false,
        }
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_cluster_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cluster_nodes = nodes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_read_from_replicas(mut self, enabled: bool) -> Self {
        self.read_from_replicas = enabled;
        self
    }

    /// Single-node URL without credentials.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// Cluster seed URLs; falls back to `host:port` when no nodes are listed.
    pub fn cluster_urls(&self) -> Vec<String> {
        if self.cluster_nodes.is_empty() {
            return vec![format!("redis://{}:{}", self.host, self.port)];
        }
        self.cluster_nodes
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

    pub(crate) fn password(&self) -> Option<String> {
        self.password.as_ref().map(|p| p.expose_secret().to_string())
    }

    /// Reject configurations no transport can use.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::Config("port must be non-zero".to_string()));
        }
        if self.db < 0 {
            return Err(ClientError::Config(format!(
                "db must be non-negative, got {}",
                self.db
            )));
        }
        Ok(())
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new("localhost", 6379)
    }
}

impl From<&Settings> for ConnectionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            db: settings.db,
            username: settings.username.clone(),
            password: settings.password.clone().map(SecretString::from),
            cluster_nodes: settings.cluster.nodes.clone(),
            read_from_replicas: settings.cluster.read_from_replicas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_has_no_credentials() {
        let config = ConnectionConfig::new("cache.local", 6380)
            .with_db(2)
            .with_username("app")
            .with_password("hunter2");
        assert_eq!(config.url(), "redis://cache.local:6380/2");
        assert_eq!(config.password().as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ConnectionConfig::default().with_password("hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_cluster_urls() {
        let config = ConnectionConfig::new("a", 7000);
        assert_eq!(config.cluster_urls(), vec!["redis://a:7000"]);

        let config = config.with_cluster_nodes(["b:7001", "redis://c:7002"]);
        assert_eq!(config.cluster_urls(), vec!["redis://b:7001", "redis://c:7002"]);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.port = 6390;
        settings.password = Some("pw".to_string());
        settings.cluster.nodes = vec!["n1:7000".to_string()];
        settings.cluster.read_from_replicas = true;

        let config = ConnectionConfig::from(&settings);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6390);
        assert_eq!(config.password().as_deref(), Some("pw"));
        assert_eq!(config.cluster_nodes, vec!["n1:7000"]);
        assert!(config.read_from_replicas);
    }

    #[test]
    fn test_validate() {
        assert!(ConnectionConfig::default().validate().is_ok());
        assert!(ConnectionConfig::new("", 6379).validate().is_err());
        assert!(ConnectionConfig::new("h", 0).validate().is_err());
        assert!(ConnectionConfig::default().with_db(-1).validate().is_err());
    }
}
