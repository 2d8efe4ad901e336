//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - credentials, storage and issuer invariants
//! - logging level

use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{IssuerConfig, LoggingConfig, ManagerConfig, StorageConfig};

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_config(cfg: &ManagerConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    // credentials
    if cfg.app_id.trim().is_empty() {
        errors.push("config: 'app_id' must not be empty".to_string());
    }
    if cfg.app_secret.trim().is_empty() {
        errors.push("config: 'app_secret' must not be empty".to_string());
    }

    validate_issuer(&cfg.issuer, &mut errors);
    validate_storage(&cfg.storage, &mut errors);
    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

fn validate_issuer(issuer: &IssuerConfig, errors: &mut Vec<String>) {
    match Url::parse(&issuer.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "issuer.base_url '{}' has unsupported scheme '{}'",
            issuer.base_url,
            url.scheme()
        )),
        Err(e) => errors.push(format!("issuer.base_url '{}' is invalid: {}", issuer.base_url, e)),
    }
    if issuer.timeout_ms == 0 {
        errors.push("issuer.timeout_ms must be > 0".to_string());
    }
}

fn validate_storage(storage: &StorageConfig, errors: &mut Vec<String>) {
    match storage {
        StorageConfig::File { path } => {
            if path.trim().is_empty() {
                errors.push("storage.path must not be empty for 'file' storage".to_string());
            } else if path.ends_with('/') {
                errors.push(format!("storage.path '{}' must point to a file", path));
            }
        }
        StorageConfig::Memory { .. } => {}
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    let valid = ["trace", "debug", "info", "warn", "error"];
    if !valid.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' invalid; allowed: {:?}",
            logging.level, valid
        ));
    }
}
