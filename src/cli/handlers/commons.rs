// src/cli/handlers/commons.rs

// This module contains shared functions used by multiple handlers.

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::Path;

use crate::models::Microservice;

/// Expands `~` and, when the directory exists, canonicalizes it.
///
/// A location that does not exist yet is stored as typed, with a warning: the
/// project may simply not be checked out on this machine.
pub fn normalize_location(raw: &str) -> String {
    let expanded = shellexpand::tilde(raw.trim()).into_owned();
    let path = Path::new(&expanded);

    if path.is_dir() {
        match dunce::canonicalize(path) {
            Ok(canonical) => return canonical.to_string_lossy().into_owned(),
            Err(e) => log::debug!("Could not canonicalize '{}': {}", expanded, e),
        }
    } else {
        println!(
            "{}",
            format!(t!("common.warning.location_missing"), path = expanded).yellow()
        );
    }
    expanded
}

/// Asks the user for a yes/no answer. Defaults to "no".
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// One-line summary used by `add`, `update` and `list`.
pub fn describe_microservice(microservice: &Microservice) -> String {
    let port = microservice
        .default_port
        .as_deref()
        .map(|p| format!(" :{}", p))
        .unwrap_or_default();
    format!(
        "{} {} [{}]{}",
        microservice.id.cyan().bold(),
        microservice.display_name(),
        microservice.build_tool.to_string().green(),
        port.yellow()
    )
}
