//! Configuration management for conoha-ojs
//!
//! The config file holds the credential record (input credentials plus the
//! cached token), HTTP client settings and logging settings. It is read
//! once at startup and written back after a successful authentication.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, CredentialRecord};
use crate::constants::{config as config_constants, http};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Credentials and cached authentication results
    pub account: CredentialRecord,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Send the legacy form content type with the JSON body
    pub legacy_content_type: bool,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            legacy_content_type: true,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            legacy_content_type: self.legacy_content_type,
            ..ClientConfig::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration, returning it with the path it belongs to
    ///
    /// An explicit `config_file_override` must exist. Without an override
    /// the first existing file among the standard locations is used; if
    /// none exists, defaults are returned with the user config path so a
    /// later save creates it.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<(Self, PathBuf)> {
        if let Some(path) = config_file_override {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            let config = Self::load_from_file(&path).await?;
            return Ok((config, path));
        }

        let path = Self::find_config_file()?;
        if path.exists() {
            let config = Self::load_from_file(&path).await?;
            Ok((config, path))
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok((Self::default(), path))
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> ConfigResult<PathBuf> {
        let local = PathBuf::from(config_constants::LOCAL_FILE_NAME);
        if local.exists() {
            debug!("Found config file: {}", local.display());
            return Ok(local);
        }

        Self::get_default_config_path()
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir
            .join(config_constants::APP_DIR)
            .join(config_constants::FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to a TOML file
    ///
    /// The content is written to a temporary sibling and renamed into
    /// place, so an interrupted save never leaves a truncated file. On Unix
    /// the file is readable by the owner only.
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let content = toml::to_string_pretty(self)?;
        let temp_path = path.with_extension("toml.tmp");

        tokio::fs::write(&temp_path, content)
            .await
            .map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(config_constants::FILE_PERMISSIONS);
            tokio::fs::set_permissions(&temp_path, perms)
                .await
                .map_err(io_error)?;
        }

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(io_error)?;

        info!("Saved configuration to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_creation() {
        let config = AppConfig::default();

        assert!(config.account.username.is_empty());
        assert!(config.client.legacy_content_type);
        assert_eq!(config.client.request_timeout_secs, 60);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_client_runtime_conversion() {
        let toml_config = ClientConfigToml {
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            legacy_content_type: false,
        };

        let runtime = toml_config.to_runtime_config();
        assert_eq!(runtime.request_timeout, Duration::from_secs(5));
        assert_eq!(runtime.connect_timeout, Duration::from_secs(2));
        assert_eq!(runtime.content_type(), "application/json");
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        // Should fail when explicitly specified
        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let test_config = r#"
[account]
username = "gncu12345678"
password = "secret"
tenant_id = "0123456789abcdef"
token_expires = "Tue, 01 Jan 2030 00:00:00 UTC"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let (config, path) = AppConfig::load(Some(config_path.clone())).await.unwrap();

        assert_eq!(path, config_path);
        assert_eq!(config.account.username, "gncu12345678");
        assert_eq!(config.account.tenant_id, "0123456789abcdef");
        assert!(config.account.token.is_empty());
        assert!(config.account.auth_url.is_empty());
        assert_eq!(config.logging.level, "debug");
        // Missing section falls back to defaults
        assert_eq!(config.client, ClientConfigToml::default());
    }

    #[tokio::test]
    async fn test_config_invalid_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "[account\nusername = ")
            .await
            .unwrap();

        let result = AppConfig::load_from_file(&config_path).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.account = CredentialRecord {
            token: "token-abc".to_string(),
            token_expires: "Tue, 01 Jan 2030 00:00:00 UTC".to_string(),
            endpoint_url: "https://store.example/v1/AUTH_t".to_string(),
            ..CredentialRecord::new("user", "secret", "tenant")
        };

        config.save(&config_path).await.unwrap();
        assert!(!config_path.with_extension("toml.tmp").exists());

        let reloaded = AppConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(reloaded, config);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(&config_path).unwrap();
            assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        }
    }
}
