//! Configuration for the command line tool.
//!
//! Loaded from:
//! 1. Default values
//! 2. Config file (`$OBSIDIAN_ACTIONS_CONFIG` or
//!    `<config dir>/obsidian-actions/config.toml`)
//! 3. Environment variables (`OBSIDIAN_ACTIONS_*`)

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "OBSIDIAN_ACTIONS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,

    /// Explicit path to the `xcall` binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcall: Option<PathBuf>,
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file; a missing file gives the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
            .map_err(|e| VaultError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("obsidian-actions").join("config.toml"))
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(vault) = lookup(&format!("{}_VAULT", ENV_PREFIX)).filter(|v| !v.is_empty()) {
            self.vault = Some(vault);
        }
        if let Some(xcall) = lookup(&format!("{}_XCALL", ENV_PREFIX)).filter(|v| !v.is_empty()) {
            self.xcall = Some(PathBuf::from(xcall));
        }
    }

    /// Pick the vault name: the command line wins over the configuration.
    pub fn resolve_vault(&self, cli_vault: Option<&str>) -> Result<String> {
        cli_vault
            .map(str::to_string)
            .or_else(|| self.vault.clone())
            .ok_or_else(|| {
                VaultError::ConfigError(format!(
                    "no vault given; pass --vault or set {}_VAULT",
                    ENV_PREFIX
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_str() {
        let config = Config::load_from_str("vault = \"Main\"\nxcall = \"/opt/xcall\"\n").unwrap();
        assert_eq!(config.vault.as_deref(), Some("Main"));
        assert_eq!(config.xcall, Some(PathBuf::from("/opt/xcall")));
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(Config::load_from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::load_from_str("vault = [").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_bad_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "xcall = 3").unwrap();

        match Config::load_from_path(&path) {
            Err(VaultError::ConfigError(msg)) => assert!(msg.contains("config.toml")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OBSIDIAN_ACTIONS_VAULT", "Work"),
            ("OBSIDIAN_ACTIONS_XCALL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            vault: Some("Main".into()),
            xcall: Some(PathBuf::from("/opt/xcall")),
        };
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.vault.as_deref(), Some("Work"));
        assert_eq!(config.xcall, Some(PathBuf::from("/opt/xcall")));
    }

    #[test]
    fn test_resolve_vault() {
        let config = Config {
            vault: Some("Main".into()),
            ..Config::default()
        };
        assert_eq!(config.resolve_vault(Some("Other")).unwrap(), "Other");
        assert_eq!(config.resolve_vault(None).unwrap(), "Main");
        assert!(matches!(
            Config::default().resolve_vault(None),
            Err(VaultError::ConfigError(_))
        ));
    }
}
