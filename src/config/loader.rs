//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::StarterConfig;
use crate::config::settings::Settings;
use crate::config::validation::validate_config;
use crate::config::{ConfigError, ConfigResult};

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
}

/// Load and validate configuration from a TOML file, or defaults when no
/// file is given.
pub fn load_config(path: Option<&Path>) -> ConfigResult<StarterConfig> {
    load_config_with(path, &ConfigOverrides::default())
}

/// Like [`load_config`], with `overrides` applied before validation.
pub fn load_config_with(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> ConfigResult<StarterConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => StarterConfig::default(),
    };

    if let Some(bind) = &overrides.bind_address {
        config.server.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve [`Settings`] with environment variables layered over the file's
/// `[app]` section.
pub fn load_settings(config: &StarterConfig) -> ConfigResult<Settings> {
    Settings::from_lookup(|key| {
        std::env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| config.app.get(key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("starter-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nrequest_timeout_secs = 5\n[app]\napp_id = \"from-file\"").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.request_timeout_secs, 5);
        assert_eq!(config.app.app_id.as_deref(), Some("from-file"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_rejected() {
        let path = std::env::temp_dir().join(format!("starter-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[server]\nrequest_timeout_secs = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("request_timeout_secs"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_bind_override_is_validated() {
        let overrides = ConfigOverrides {
            bind_address: Some("not-an-address".to_string()),
        };
        let err = load_config_with(None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.bind_address"));

        let overrides = ConfigOverrides {
            bind_address: Some("127.0.0.1:4000".to_string()),
        };
        let config = load_config_with(None, &overrides).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
