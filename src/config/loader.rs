//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `downstream.base_url` when set and non-empty.
pub const LLM_SERVICE_URL_ENV: &str = "LLM_SERVICE_URL";

/// Overrides `listener.bind_address` when set and non-empty.
pub const BIND_ADDRESS_ENV: &str = "GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment. The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(LLM_SERVICE_URL_ENV) {
        config.downstream.base_url = url;
    }
    if let Some(addr) = non_empty(BIND_ADDRESS_ENV) {
        config.listener.bind_address = addr;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_base_url_and_bind() {
        let config = apply_env_overrides(
            GatewayConfig::default(),
            env(&[
                (LLM_SERVICE_URL_ENV, "http://127.0.0.1:8000"),
                (BIND_ADDRESS_ENV, "127.0.0.1:9999"),
            ]),
        );
        assert_eq!(config.downstream.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
    }

    #[test]
    fn empty_env_falls_back_to_default() {
        let config =
            apply_env_overrides(GatewayConfig::default(), env(&[(LLM_SERVICE_URL_ENV, "")]));
        assert_eq!(config.downstream.base_url, "http://llm-service:8000");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "a",
                message: "bad".into(),
            },
            ValidationError {
                field: "b",
                message: "worse".into(),
            },
        ]);
        assert_eq!(err.to_string(), "Validation failed: a: bad, b: worse");
    }
}
