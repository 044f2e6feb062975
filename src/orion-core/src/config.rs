use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for a Knowledge Processor
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// Scheme and hostname, e.g. `http://localhost`
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Basic auth credential as `user:password`
    #[serde(default)]
    pub credential: Option<String>,
    /// Log every request and response body
    #[serde(default)]
    pub debug: bool,
    /// Request timeout in milliseconds; unset means no explicit timeout
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_host() -> String {
    "http://localhost".to_string()
}

fn default_port() -> u16 {
    1026 // Orion's default listen port
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Split the credential on its first colon into (user, password)
    pub fn basic_auth(&self) -> Option<(&str, Option<&str>)> {
        self.credential.as_deref().map(|credential| {
            match credential.split_once(':') {
                Some((user, password)) => (user, Some(password)),
                None => (credential, None),
            }
        })
    }

    /// Base URL every NGSI10 path is appended to
    pub fn base_url(&self) -> String {
        format!("{}:{}/ngsi10", self.host, self.port)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            credential: None,
            debug: false,
            timeout_ms: None,
        }
    }
}
