use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::role::{Role, Viewer};
use crate::repository::RoleDirectory;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const HOME_ENV: &str = "FIELDOPS_HOME";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Jobs taking longer than this from creation to completion count as delays.
    pub delay_threshold_hours: f64,
    pub top_performers: usize,
    pub currency: String,
    /// Explicit name -> role table. Unknown names resolve to `Customer`.
    pub roles: HashMap<String, Role>,
    pub outbox_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_threshold_hours: 24.0,
            top_performers: 3,
            currency: "RM".to_string(),
            roles: HashMap::new(),
            outbox_file: "outbox.jsonl".to_string(),
        }
    }
}

impl Config {
    /// Loads `<data_dir>/config.json`, falling back to defaults when the
    /// file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// `--data-dir`, then `$FIELDOPS_HOME`, then `~/.fieldops`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(".fieldops"))
}

/// Role lookup backed by the `roles` table of the config file.
pub struct ConfigRoleDirectory {
    roles: HashMap<String, Role>,
}

impl ConfigRoleDirectory {
    pub fn new(config: &Config) -> Self {
        Self {
            roles: config.roles.clone(),
        }
    }
}

impl RoleDirectory for ConfigRoleDirectory {
    fn role_of(&self, name: &str) -> Role {
        self.roles.get(name).copied().unwrap_or_default()
    }
}

pub fn resolve_viewer<D: RoleDirectory>(directory: &D, name: &str) -> Viewer {
    Viewer::new(name, directory.role_of(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_performers, 3);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "delayThresholdHours": 48, "roles": { "Aina": "admin", "Ali": "technician" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.delay_threshold_hours, 48.0);
        assert_eq!(config.currency, "RM");

        let directory = ConfigRoleDirectory::new(&config);
        assert_eq!(resolve_viewer(&directory, "Aina").role, Role::Administrator);
        assert_eq!(resolve_viewer(&directory, "Ali").role, Role::Technician);
        assert_eq!(resolve_viewer(&directory, "Stranger").role, Role::Customer);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolve_explicit_data_dir() {
        let dir = PathBuf::from("/tmp/fieldops-test");
        assert_eq!(resolve_data_dir(Some(dir.clone())).unwrap(), dir);
    }
}
