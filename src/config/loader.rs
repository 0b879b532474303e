//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Environment variable naming the config file when no path is given.
pub const CONFIG_ENV: &str = "SETTINGS_MANAGER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path`, else from `$SETTINGS_MANAGER_CONFIG`, else defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }
    match std::env::var_os(CONFIG_ENV) {
        Some(env_path) => load_config(Path::new(&env_path)),
        None => Ok(ServerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, StorageBackend};

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [storage]
            backend = "memory"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.record_name, "plugin_settings");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.cache.ttl_secs, 43_200);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[cache]\nttl_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref issues) if issues.len() == 1));
        assert!(err.to_string().contains("cache.ttl_secs"));
    }

    #[test]
    fn test_syntax_error_reported() {
        assert!(matches!(parse_config("[listener"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[admin]\napi_key = \"s3cret\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.admin.api_key, "s3cret");
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
