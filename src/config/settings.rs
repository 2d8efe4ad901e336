use serde::Deserialize;

use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_ISSUER_BASE_URL};

/// ================================
/// Full manager configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ManagerConfig {
    pub app_id: String,
    pub app_secret: String,
    #[serde(default)]
    pub issuer: IssuerConfig,
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// ================================
/// Issuer
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct IssuerConfig {
    #[serde(default = "default_issuer_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            base_url: default_issuer_base_url(),
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// ================================
/// Storage
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// JSON document with the full issuer response
    File { path: String },
    /// process-local key-value store, optionally pre-seeded
    Memory {
        #[serde(default)]
        token: Option<String>,
    },
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub is_enabled: bool,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level: level, format: format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_issuer_base_url() -> String {
    DEFAULT_ISSUER_BASE_URL.to_owned()
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}
