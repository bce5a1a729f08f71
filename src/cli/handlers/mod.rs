// src/cli/handlers/mod.rs

// This module contains the logic for each CLI command.

pub mod add;
pub mod commons;
pub mod list;
pub mod remove;
pub mod repair;
pub mod run;
pub mod script;
pub mod settings;
pub mod update;
