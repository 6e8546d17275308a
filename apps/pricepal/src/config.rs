//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRICEPAL_DB_PATH=/data/pricepal.db                                 │
//! │     PRICEPAL_REPORT_POLICY=every_frame                                 │
//! │     PRICEPAL_FEEDBACK=bell                                             │
//! │     PRICEPAL_DEFAULT_SHOP="Corner Store"                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pricepal/pricepal.toml (Linux)                           │
//! │     ~/Library/Application Support/com.pricepal.pricepal/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     await_reset, log feedback, platform data dir database              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/pricepal/pricepal.db"
//! max_connections = 5
//!
//! [scanner]
//! report_policy = "await_reset"  # await_reset | every_frame
//! feedback = "bell"              # none | log | bell
//!
//! [inventory]
//! default_shop = "Corner Store"
//! ```

use std::path::PathBuf;

use pricepal_scanner::{FeedbackKind, ReportPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "pricepal.toml";

/// File name of the database inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "pricepal.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or parsing the config file failed.
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    /// Writing the config file failed.
    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    /// No platform directory could be determined.
    #[error("Could not determine the {0} directory")]
    NoPlatformDir(&'static str),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[scanner]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Whether a reset is required between reports.
    #[serde(default)]
    pub report_policy: ReportPolicy,

    /// Acknowledgment played on a successful decode.
    #[serde(default)]
    pub feedback: FeedbackKind,
}

/// `[inventory]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Shop preselected on the scanner screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shop: Option<String>,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub inventory: InventorySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`pricepal.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "database.path must not be empty".into(),
                ));
            }
        }

        if let Some(shop) = &self.inventory.default_shop {
            if shop.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "inventory.default_shop must not be blank".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `PRICEPAL_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PRICEPAL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = lookup("PRICEPAL_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid PRICEPAL_MAX_CONNECTIONS"),
            }
        }

        if let Some(policy) = lookup("PRICEPAL_REPORT_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding report policy from environment");
                    self.scanner.report_policy = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring PRICEPAL_REPORT_POLICY"),
            }
        }

        if let Some(feedback) = lookup("PRICEPAL_FEEDBACK") {
            match feedback.parse() {
                Ok(parsed) => self.scanner.feedback = parsed,
                Err(e) => warn!(error = %e, "Ignoring PRICEPAL_FEEDBACK"),
            }
        }

        if let Some(shop) = lookup("PRICEPAL_DEFAULT_SHOP") {
            self.inventory.default_shop = Some(shop);
        }
    }

    /// Resolves the database file, creating the data directory if needed.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoPlatformDir("data"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "pricepal", "pricepal")
    }
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
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanner.report_policy, ReportPolicy::AwaitReset);
        assert_eq!(config.scanner.feedback, FeedbackKind::Log);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scanner]
            report_policy = "every_frame"
            "#,
        )
        .unwrap();

        assert_eq!(config.scanner.report_policy, ReportPolicy::EveryFrame);
        assert_eq!(config.scanner.feedback, FeedbackKind::Log);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.inventory.default_shop, None);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("PRICEPAL_DB_PATH", "/tmp/pp.db"),
            ("PRICEPAL_REPORT_POLICY", "every-frame"),
            ("PRICEPAL_FEEDBACK", "bell"),
            ("PRICEPAL_DEFAULT_SHOP", "Kiosk"),
        ]));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/pp.db")));
        assert_eq!(config.scanner.report_policy, ReportPolicy::EveryFrame);
        assert_eq!(config.scanner.feedback, FeedbackKind::Bell);
        assert_eq!(config.inventory.default_shop.as_deref(), Some("Kiosk"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/pp.db"));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("PRICEPAL_REPORT_POLICY", "whenever"),
            ("PRICEPAL_MAX_CONNECTIONS", "lots"),
        ]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        config.inventory.default_shop = Some("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("pricepal-config-{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME);

        let mut config = AppConfig::default();
        config.scanner.feedback = FeedbackKind::None;
        config.inventory.default_shop = Some("Corner Store".into());
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: AppConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
