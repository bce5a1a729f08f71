// src/state.rs

use crate::core::store::{LoadReport, SettingsStore, StoreError};
use crate::models::Ecosystem;

/// Represents the state of the loaded ecosystem.
/// It holds the current state and, once a mutation has been requested, a
/// snapshot of the state as it was loaded.
#[derive(Debug)]
enum EcosystemState {
    /// No mutable access has been handed out yet.
    Pristine(Ecosystem),
    /// Mutable access was requested. We now hold both the original snapshot
    /// and the current, mutable state.
    Dirty {
        original: Ecosystem,
        current: Ecosystem,
    },
}

/// The application state shared by every command handler: the store and the
/// ecosystem loaded from it.
#[derive(Debug)]
pub struct AppState {
    store: SettingsStore,
    state: EcosystemState,
    load_report: LoadReport,
}

impl AppState {
    pub fn new(store: SettingsStore, ecosystem: Ecosystem) -> Self {
        Self {
            store,
            state: EcosystemState::Pristine(ecosystem),
            load_report: LoadReport::default(),
        }
    }

    /// Loads (and migrates) the ecosystem from the store.
    pub fn load(store: SettingsStore) -> Result<Self, StoreError> {
        let (ecosystem, load_report) = store.load_ecosystem_with_report()?;
        Ok(Self {
            load_report,
            ..Self::new(store, ecosystem)
        })
    }

    /// What loading the store created, migrated and wrote.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Provides read-only access to the current ecosystem.
    pub fn ecosystem(&self) -> &Ecosystem {
        match &self.state {
            EcosystemState::Pristine(ecosystem) => ecosystem,
            EcosystemState::Dirty { current, .. } => current,
        }
    }

    /// Provides mutable access, taking the snapshot on first use.
    pub fn ecosystem_mut(&mut self) -> &mut Ecosystem {
        let state = std::mem::replace(&mut self.state, EcosystemState::Pristine(Ecosystem::new()));
        self.state = match state {
            EcosystemState::Pristine(current) => EcosystemState::Dirty {
                original: current.clone(),
                current,
            },
            dirty => dirty,
        };

        match &mut self.state {
            EcosystemState::Dirty { current, .. } | EcosystemState::Pristine(current) => current,
        }
    }

    /// Checks if the ecosystem needs to be saved by comparing it against the
    /// snapshot, if one exists.
    pub fn needs_saving(&self) -> bool {
        match &self.state {
            EcosystemState::Pristine(_) => false,
            EcosystemState::Dirty { original, current } => original != current,
        }
    }

    /// Writes the ecosystem back when it changed. Returns whether a write happened.
    pub fn save_if_needed(&mut self) -> Result<bool, StoreError> {
        if !self.needs_saving() {
            return Ok(false);
        }
        self.store.save_ecosystem(self.ecosystem())?;

        let state = std::mem::replace(&mut self.state, EcosystemState::Pristine(Ecosystem::new()));
        self.state = match state {
            EcosystemState::Dirty { current, .. } | EcosystemState::Pristine(current) => {
                EcosystemState::Pristine(current)
            }
        };
        Ok(true)
    }
}
