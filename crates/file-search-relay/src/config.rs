//! Configuration for the upload relay
//!
//! Read once at process boot: an optional TOML file followed by environment
//! overrides. Nothing here is consulted per request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "FILE_SEARCH_RELAY_CONFIG";

/// Main relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound transport overrides (proxy, CA certificate)
    #[serde(default)]
    pub transport: TransportConfig,
    /// Upload and indexing behaviour
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Process-wide transport overrides for calls to the file-search API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    /// Proxy used when the request does not name its own
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// PEM certificate trusted in addition to the system roots
    #[serde(default)]
    pub ssl_cert_file: Option<PathBuf>,
}

/// Upload and indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// File-search API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Seconds between operation polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Seconds to wait for indexing before giving up
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
    /// Page size for the fallback document listing
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
    /// Timeout for the fallback document listing in seconds
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_poll_interval() -> u64 { 5 }
fn default_max_wait() -> u64 { 300 }
fn default_list_page_size() -> u32 { 20 }
fn default_list_timeout() -> u64 { 30 }

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_secs: 5,
            max_wait_secs: 300, // 5 minutes
            list_page_size: 20,
            list_timeout_secs: 30,
        }
    }
}

impl UploadConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }
}

impl RelayConfig {
    /// Load configuration for this process: TOML file (if
    /// `FILE_SEARCH_RELAY_CONFIG` is set) plus environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match non_empty_env(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(non_empty_env)?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("Invalid config: {}", e)))
    }

    /// Apply environment-style overrides through `lookup`.
    ///
    /// `lookup` must return `None` for unset or empty values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy) = lookup("HTTPS_PROXY").or_else(|| lookup("https_proxy")) {
            self.transport.proxy_url = Some(proxy);
        }
        if let Some(cert) = lookup("SSL_CERT_FILE") {
            self.transport.ssl_cert_file = Some(PathBuf::from(cert));
        }
        if let Some(base) = lookup("FILE_SEARCH_API_BASE") {
            self.upload.api_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(port) = lookup("UPLOAD_SERVICE_PORT").or_else(|| lookup("PORT")) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("Invalid port: {}", port)))?;
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
