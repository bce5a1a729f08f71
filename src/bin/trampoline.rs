// src/bin/trampoline.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use trampoline::{
    cli::{Cli, dispatcher},
    core::{
        paths::{self, StoreConfig},
        platform::HostOs,
        store::SettingsStore,
    },
    state::AppState,
    t,
};

/// The main entry point of the `trampoline` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run_cli(Cli::parse()) {
        // --- Centralized Error Handling ---
        // Argument errors of a handler (including its `--help`) are printed by clap itself.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Builds the application state, runs the command and persists what it changed.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    // 1. Effective store configuration: defaults < --config < environment < --settings-dir.
    let mut config = StoreConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.settings_dir {
        config.directory_override = Some(dir);
    }

    // 2. The host is detected once and its platform travels with the store.
    let host = HostOs::detect();
    let store = SettingsStore::from_config(&config, host, &paths::current_user_name());
    log::debug!("Using settings file {} ({})", store.settings_file().display(), host.platform());

    // 3. Loading migrates legacy records and repairs their scripts.
    let mut state = AppState::load(store).with_context(|| t!("main.error.load_failed"))?;

    // 4. Run the command, then save once if anything changed.
    dispatcher::dispatch(cli.args, &mut state)?;
    if state.save_if_needed()? {
        log::debug!("Ecosystem saved to {}", state.store().settings_file().display());
    }
    Ok(())
}
