//! Configuration management infrastructure.
//!
//! Configuration file support for signing preferences: default dictionary
//! values, reserved signature space, verbosity.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::constants;
use crate::infra::error::{SignError, SignResult};

/// Application configuration with signing preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfiguration {
    /// Default `/Reason` written when the caller supplies none
    pub default_reason: String,

    /// Default `/Name` written when the caller supplies none
    pub default_signer_name: String,

    /// Default `/Location`
    pub default_location: String,

    /// Default `/ContactInfo`
    pub default_contact_info: String,

    /// Bytes reserved for the DER signature in `/Contents`
    pub reserved_signature_bytes: usize,

    /// Whether to show verbose output
    pub verbose: bool,
}

impl Default for SigningConfiguration {
    fn default() -> Self {
        Self {
            default_reason: "Digital Signature".to_string(),
            default_signer_name: "Digital Signer".to_string(),
            default_location: String::new(),
            default_contact_info: String::new(),
            reserved_signature_bytes: constants::DEFAULT_RESERVED_SIGNATURE_BYTES,
            verbose: false,
        }
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with the default path
    pub fn new() -> SignResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> SignResult<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("autopen").join("config.toml"))
        } else {
            Ok(PathBuf::from("autopen-config.toml"))
        }
    }

    /// Load configuration from file, creating the default if it doesn't exist
    pub fn load_or_create_default(&self) -> SignResult<SigningConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = SigningConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> SignResult<SigningConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            SignError::Configuration(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: SigningConfiguration = toml::from_str(&content).map_err(|e| {
            SignError::Configuration(format!("Failed to parse config file: {e}"))
        })?;

        self.validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &SigningConfiguration) -> SignResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SignError::Configuration(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            SignError::Configuration(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            SignError::Configuration(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        log::info!("Configuration saved successfully");
        Ok(())
    }

    /// Validate configuration values
    fn validate_config(&self, config: &SigningConfiguration) -> SignResult<()> {
        if config.reserved_signature_bytes == 0 {
            return Err(SignError::Configuration(
                "reserved_signature_bytes must be greater than 0".to_string(),
            ));
        }
        // A real CMS structure with a 2048-bit RSA key and certificate does
        // not fit under this floor.
        if config.reserved_signature_bytes < 1024 {
            return Err(SignError::Configuration(format!(
                "reserved_signature_bytes of {} is too small to hold a signature",
                config.reserved_signature_bytes
            )));
        }
        Ok(())
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Export configuration as a portable format
    pub fn export_config(&self, format: ExportFormat) -> SignResult<String> {
        let config = self.load()?;

        match format {
            ExportFormat::Toml => toml::to_string_pretty(&config)
                .map_err(|e| SignError::Configuration(format!("TOML export failed: {e}"))),
            ExportFormat::Json => serde_json::to_string_pretty(&config)
                .map_err(|e| SignError::Configuration(format!("JSON export failed: {e}"))),
        }
    }
}

/// Configuration export formats
#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Toml,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_configuration() {
        let config = SigningConfiguration::default();
        assert_eq!(config.default_reason, "Digital Signature");
        assert_eq!(config.default_signer_name, "Digital Signer");
        assert_eq!(
            config.reserved_signature_bytes,
            constants::DEFAULT_RESERVED_SIGNATURE_BYTES
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = SigningConfiguration::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: SigningConfiguration = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.default_reason, deserialized.default_reason);
        assert_eq!(
            config.reserved_signature_bytes,
            deserialized.reserved_signature_bytes
        );
    }

    #[test]
    fn test_config_manager_with_temp_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");
        let manager = ConfigManager::with_path(&config_path);

        let config = manager.load_or_create_default().unwrap();
        assert!(config_path.exists());

        let loaded_config = manager.load().unwrap();
        assert_eq!(
            config.reserved_signature_bytes,
            loaded_config.reserved_signature_bytes
        );
    }

    #[test]
    fn test_rejects_undersized_reservation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad_config.toml");
        let manager = ConfigManager::with_path(&config_path);

        let mut config = SigningConfiguration::default();
        config.reserved_signature_bytes = 16;
        manager.save(&config).unwrap();

        assert!(matches!(
            manager.load(),
            Err(SignError::Configuration(_))
        ));
    }
}
