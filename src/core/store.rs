//! # Settings Store
//!
//! Sole owner of the on-disk settings file. It creates the store on first use,
//! loads and migrates the ecosystem, and writes it back in one shot.
//!
//! All operations are blocking and unsynchronized: two processes saving at the
//! same time race, and the last writer wins.

use crate::{
    core::{
        migration::{self, MigrationReport},
        registry,
        paths::StoreConfig,
        platform::{HostOs, Platform},
    },
    models::{Ecosystem, Microservice, StoredEcosystem},
    system::script::{self, ScriptError},
};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not create the settings store at '{path}': {source}")]
    StoreInit {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file '{path}' does not contain a valid ecosystem: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not write settings file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file '{path}' holds a microservice with the unusable id '{id}'")]
    InvalidId { path: String, id: String },
    #[error("Failed to serialize the ecosystem: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

type StoreResult<T> = Result<T, StoreError>;

/// What a call to [`SettingsStore::load_ecosystem_with_report`] did besides reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The directory or the settings file had to be created.
    pub created_store: bool,
    pub migration: MigrationReport,
    /// Number of times the settings file was written during the load.
    pub saves: usize,
}

/// Handle on the settings directory of one installation.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    directory: PathBuf,
    file_name: String,
    platform: Platform,
}

impl SettingsStore {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>, platform: Platform) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
            platform,
        }
    }

    /// Builds a store from the effective configuration for the given host and user.
    pub fn from_config(config: &StoreConfig, host: HostOs, user_name: &str) -> Self {
        let directory = config.settings_directory(host, user_name);
        log::debug!("Settings directory resolved to '{}'", directory.display());
        Self::new(directory, config.file_name.clone(), host.platform())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn settings_file(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn script_path(&self, id: &str) -> PathBuf {
        script::script_path(&self.directory, self.platform, id)
    }

    /// Creates the settings directory and an empty settings file when they are missing.
    /// Returns `true` if anything was created. Calling it on an existing store is a no-op.
    pub fn ensure_store_exists(&self) -> StoreResult<bool> {
        let init_error = |path: &Path, source| StoreError::StoreInit {
            path: path.display().to_string(),
            source,
        };

        let mut created = false;
        if !self.directory.is_dir() {
            fs::create_dir_all(&self.directory).map_err(|e| init_error(&self.directory, e))?;
            created = true;
        }

        let file = self.settings_file();
        if !file.exists() {
            let json = serialize(&Ecosystem::new())?;
            fs::write(&file, json).map_err(|e| init_error(&file, e))?;
            log::info!("Created empty settings file at '{}'", file.display());
            created = true;
        }
        Ok(created)
    }

    /// Loads the ecosystem, migrating and persisting legacy records on the way.
    pub fn load_ecosystem(&self) -> StoreResult<Ecosystem> {
        self.load_ecosystem_with_report().map(|(ecosystem, _)| ecosystem)
    }

    /// Same as [`Self::load_ecosystem`], also reporting what the load changed.
    pub fn load_ecosystem_with_report(&self) -> StoreResult<(Ecosystem, LoadReport)> {
        let created_store = self.ensure_store_exists()?;

        let file = self.settings_file();
        let content = fs::read_to_string(&file).map_err(|e| StoreError::Read {
            path: file.display().to_string(),
            source: e,
        })?;
        let stored: StoredEcosystem =
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: file.display().to_string(),
                source: e,
            })?;

        // Ids become script file names, so one that could leave the directory
        // is refused before anything is written.
        if let Some(bad) = stored
            .microservices
            .iter()
            .find(|m| registry::validate_id(&m.id).is_err())
        {
            return Err(StoreError::InvalidId {
                path: file.display().to_string(),
                id: bad.id.clone(),
            });
        }

        let (ecosystem, migration) = migration::migrate(stored);
        let mut saves = 0;

        if !migration.regenerated.is_empty() {
            for id in &migration.regenerated {
                if let Some(microservice) = ecosystem.microservices.iter().find(|m| &m.id == id) {
                    script::create_script(&self.directory, self.platform, microservice)?;
                }
            }
            log::info!(
                "Regenerated launch scripts for {} legacy record(s)",
                migration.regenerated.len()
            );
            self.save_ecosystem(&ecosystem)?;
            saves += 1;
        }

        if !migration.defaulted_build_tool.is_empty() {
            log::info!(
                "Defaulted build tool to MAVEN for {} record(s)",
                migration.defaulted_build_tool.len()
            );
            self.save_ecosystem(&ecosystem)?;
            saves += 1;
        }

        Ok((
            ecosystem,
            LoadReport {
                created_store,
                migration,
                saves,
            },
        ))
    }

    /// Overwrites the settings file with the complete ecosystem.
    pub fn save_ecosystem(&self, ecosystem: &Ecosystem) -> StoreResult<()> {
        let file = self.settings_file();
        let json = serialize(ecosystem)?;
        fs::write(&file, json).map_err(|e| StoreError::Write {
            path: file.display().to_string(),
            source: e,
        })?;
        log::debug!(
            "Saved {} microservice(s) to '{}'",
            ecosystem.microservices.len(),
            file.display()
        );
        Ok(())
    }

    /// Writes the launch script of a microservice into the settings directory.
    pub fn create_script(&self, microservice: &Microservice) -> Result<PathBuf, ScriptError> {
        script::create_script(&self.directory, self.platform, microservice)
    }

    /// Deletes the launch script of a microservice. A missing script is not an error.
    pub fn remove_script(&self, id: &str) -> Result<bool, ScriptError> {
        let path = self.script_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ScriptError::Removal {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}

fn serialize(ecosystem: &Ecosystem) -> StoreResult<String> {
    serde_json::to_string(ecosystem).map_err(StoreError::Serialize)
}
