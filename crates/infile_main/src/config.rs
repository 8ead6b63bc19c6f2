//! Application configuration

use directories::ProjectDirs;
use infile_fs::ContainerOptions;
use infile_log::LogOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub container: ContainerOptions,
    pub logging: LogOptions,
}

impl AppConfig {
    /// Load configuration from a file, defaults when it does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(config_path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "InFile", "InFile")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.container.create);
        assert!(config.container.lock);
    }

    #[test]
    fn test_partial_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let content = "[container]\nlock = false\n\n[logging]\njson = true\n";
        std::fs::write(&path, content).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(!config.container.lock);
        assert!(config.container.create);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, LogOptions::default().level);
    }

    #[test]
    fn test_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[container\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
