//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RateLimitConfig;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.listener.workers, 20);
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(matches!(
            config.rate_limit,
            RateLimitConfig::FixedWindow {
                window_secs: 60,
                max_requests: 2
            }
        ));
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let content = r#"
            [listener]
            bind_address = "127.0.0.1:9090"

            [rate_limit]
            strategy = "token_bucket"
            capacity = 5
            fill_rate = 1.0
        "#;

        let config = parse_config(content).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9090");
        assert_eq!(config.listener.workers, 20);
        assert!(matches!(
            config.rate_limit,
            RateLimitConfig::TokenBucket { capacity: 5, .. }
        ));
    }

    #[test]
    fn semantic_problems_surface_as_validation_errors() {
        let content = r#"
            [listener]
            workers = 0

            [cache]
            capacity = 0
        "#;

        match parse_config(content) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            parse_config("listener = \"not a table\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
