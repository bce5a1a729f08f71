// src/core/paths.rs

use crate::constants::{
    DEFAULT_SETTINGS_FILENAME, DEFAULT_SETTINGS_PATH_LINUX, DEFAULT_SETTINGS_PATH_MAC,
    DEFAULT_SETTINGS_PATH_WINDOWS, ENV_SETTINGS_DIR, ENV_SETTINGS_FILE, ENV_SETTINGS_PATH_LINUX,
    ENV_SETTINGS_PATH_MAC, ENV_SETTINGS_PATH_WINDOWS, USER_NAME_TOKEN,
};
use crate::core::platform::HostOs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// The per-OS templates used to locate the settings directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsTemplates {
    pub windows: String,
    pub mac: String,
    pub linux: String,
}

impl Default for SettingsTemplates {
    fn default() -> Self {
        Self {
            windows: DEFAULT_SETTINGS_PATH_WINDOWS.to_string(),
            mac: DEFAULT_SETTINGS_PATH_MAC.to_string(),
            linux: DEFAULT_SETTINGS_PATH_LINUX.to_string(),
        }
    }
}

/// Everything needed to find the settings file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub templates: SettingsTemplates,
    pub file_name: String,
    /// When set, used verbatim instead of resolving a template.
    pub directory_override: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            templates: SettingsTemplates::default(),
            file_name: DEFAULT_SETTINGS_FILENAME.to_string(),
            directory_override: None,
        }
    }
}

/// The shape of an optional `--config` TOML file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct StoreConfigFile {
    windows: Option<String>,
    mac: Option<String>,
    linux: Option<String>,
    file_name: Option<String>,
    directory: Option<PathBuf>,
}

impl StoreConfig {
    /// Builds the effective configuration: compiled-in defaults, then the optional
    /// TOML file, then the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = config_file {
            config.merge_file(path)?;
        }
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merges the keys present in a TOML configuration file into `self`.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: StoreConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Loaded store configuration from '{}'", path.display());

        if let Some(v) = file.windows {
            self.templates.windows = v;
        }
        if let Some(v) = file.mac {
            self.templates.mac = v;
        }
        if let Some(v) = file.linux {
            self.templates.linux = v;
        }
        if let Some(v) = file.file_name {
            self.file_name = v;
        }
        if file.directory.is_some() {
            self.directory_override = file.directory;
        }
        Ok(())
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_SETTINGS_PATH_WINDOWS) {
            self.templates.windows = v;
        }
        if let Some(v) = non_empty(ENV_SETTINGS_PATH_MAC) {
            self.templates.mac = v;
        }
        if let Some(v) = non_empty(ENV_SETTINGS_PATH_LINUX) {
            self.templates.linux = v;
        }
        if let Some(v) = non_empty(ENV_SETTINGS_FILE) {
            self.file_name = v;
        }
        if let Some(v) = non_empty(ENV_SETTINGS_DIR) {
            self.directory_override = Some(PathBuf::from(v));
        }
    }

    /// Returns the settings directory for the given host and user.
    pub fn settings_directory(&self, host: HostOs, user_name: &str) -> PathBuf {
        match &self.directory_override {
            Some(dir) => dir.clone(),
            None => resolve_settings_directory(&self.templates, host, user_name),
        }
    }
}

/// Computes the settings directory from the template of the given OS, substituting
/// the user name token and expanding a leading `~`. Performs no I/O.
pub fn resolve_settings_directory(
    templates: &SettingsTemplates,
    host: HostOs,
    user_name: &str,
) -> PathBuf {
    let template = match host {
        HostOs::Windows => &templates.windows,
        HostOs::MacOs => &templates.mac,
        HostOs::Linux => &templates.linux,
    };

    let with_user = if template.contains(USER_NAME_TOKEN) {
        template.replace(USER_NAME_TOKEN, user_name)
    } else {
        template.clone()
    };

    PathBuf::from(shellexpand::tilde(&with_user).into_owned())
}

/// Returns the name of the current OS user.
pub fn current_user_name() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .or_else(|| {
            dirs::home_dir()
                .and_then(|home| home.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_substitutes_user_name_per_os() {
        let templates = SettingsTemplates::default();
        assert_eq!(
            resolve_settings_directory(&templates, HostOs::Linux, "ada"),
            PathBuf::from("/home/ada/Documents/trampoline/settings")
        );
        assert_eq!(
            resolve_settings_directory(&templates, HostOs::MacOs, "ada"),
            PathBuf::from("/Users/ada/Documents/trampoline/settings")
        );
        assert_eq!(
            resolve_settings_directory(&templates, HostOs::Windows, "ada"),
            PathBuf::from("C:\\trampoline\\settings")
        );
    }

    #[test]
    fn test_resolve_replaces_every_occurrence() {
        let templates = SettingsTemplates {
            linux: "/srv/#userName/trampoline/#userName".to_string(),
            ..Default::default()
        };
        assert_eq!(
            resolve_settings_directory(&templates, HostOs::Linux, "bob"),
            PathBuf::from("/srv/bob/trampoline/bob")
        );
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SETTINGS_PATH_LINUX, "/opt/#userName/settings"),
            (ENV_SETTINGS_FILE, "   "),
        ]);
        let mut config = StoreConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.templates.linux, "/opt/#userName/settings");
        assert_eq!(config.file_name, DEFAULT_SETTINGS_FILENAME);
        assert!(config.directory_override.is_none());
    }

    #[test]
    fn test_directory_override_wins() {
        let mut config = StoreConfig::default();
        config.apply_overrides(|key| (key == ENV_SETTINGS_DIR).then(|| "/tmp/tr".to_string()));
        assert_eq!(
            config.settings_directory(HostOs::Linux, "ignored"),
            PathBuf::from("/tmp/tr")
        );
    }

    #[test]
    fn test_merge_file_reads_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "linux = \"/data/#userName\"\nfile_name = \"ecosystem.json\"").unwrap();
        file.flush().unwrap();

        let mut config = StoreConfig::default();
        config.merge_file(file.path()).unwrap();

        assert_eq!(config.templates.linux, "/data/#userName");
        assert_eq!(config.file_name, "ecosystem.json");
        assert_eq!(config.templates.mac, DEFAULT_SETTINGS_PATH_MAC);
    }

    #[test]
    fn test_merge_file_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "linx = \"/typo\"").unwrap();
        file.flush().unwrap();

        let result = StoreConfig::default().merge_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
