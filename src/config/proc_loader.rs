use std::path::Path;
use crate::config::settings::{LoggingConfig, ManagerConfig};
use crate::config::proc_validator;
use anyhow::{anyhow, Result};
use regex::{Captures, Regex};
use tracing::{debug, error};

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ManagerConfig> {
    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| anyhow!("cannot read config {}: {}", path.display(), e))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ManagerConfig> {
    let mut config: ManagerConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
        })?;

    // Apply defaults
    if config.logging.is_none() {
        config.logging = Some(LoggingConfig::default());
    }
    debug!("validation config ...");
    proc_validator::validate_config(&config)
        .map_err(|errors| anyhow!("config is not valid, total errors: {}\n{}", errors.len(), errors.join("\n")))?;

    Ok(config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    Ok(re
        .replace_all(input, |caps: &Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_used_when_variable_is_unset() {
        let out = expand_env_vars("path: ${TOKEN_MANAGER_SURELY_UNSET_VAR:/tmp/token.json}").unwrap();
        assert_eq!(out, "path: /tmp/token.json");
    }

    #[test]
    fn unset_variable_without_default_is_empty() {
        let out = expand_env_vars("secret: '${TOKEN_MANAGER_SURELY_UNSET_VAR}'").unwrap();
        assert_eq!(out, "secret: ''");
    }
}
