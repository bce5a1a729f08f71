use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, core::registry, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Unregisters a microservice and deletes its launch script."
)]
struct RemoveArgs {
    /// Id of the microservice to remove.
    id: String,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

/// The record is saved before its script is deleted: if the save fails the
/// microservice stays registered with a working script.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let remove_args = RemoveArgs::try_parse_from(&args)?;

    // Fail on unknown ids before asking anything.
    let target = registry::find_microservice(state.ecosystem(), &remove_args.id)?;
    println!("  {}", commons::describe_microservice(target));

    if !remove_args.yes
        && !commons::confirm(&format!(t!("remove.prompt.confirm"), id = remove_args.id))?
    {
        println!("{}", t!("common.info.aborted").yellow());
        return Ok(());
    }

    let removed = registry::remove_microservice(state.ecosystem_mut(), &remove_args.id)?;
    state.save_if_needed()?;
    if !state.store().remove_script(&removed.id)? {
        log::warn!("Microservice '{}' had no launch script to delete.", removed.id);
    }

    println!(
        "{} {}",
        "✔".green(),
        format!(t!("remove.success"), id = removed.id.cyan().bold())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{platform::Platform, store::SettingsStore},
        models::{BuildTool, Microservice},
    };
    use std::fs;
    use tempfile::TempDir;

    fn state_with_service(dir: &TempDir) -> AppState {
        let store = SettingsStore::new(dir.path(), "settings.txt", Platform::Unix);
        let mut state = AppState::load(store).unwrap();
        let microservice = Microservice {
            id: "svc1".to_string(),
            pom_location: "/proj".to_string(),
            build_tool: BuildTool::Maven,
            vm_arguments: String::new(),
            actuator_prefix: String::new(),
            name: None,
            default_port: None,
        };
        state.store().create_script(&microservice).unwrap();
        state.ecosystem_mut().microservices.push(microservice);
        state.save_if_needed().unwrap();
        state
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_remove_saves_then_deletes_script() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_service(&dir);

        handle(args(&["svc1", "--yes"]), &mut state).unwrap();

        assert!(!state.needs_saving());
        assert!(state.store().load_ecosystem().unwrap().microservices.is_empty());
        assert!(!state.store().script_path("svc1").exists());
    }

    #[test]
    fn test_failed_save_keeps_the_script() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_service(&dir);
        let settings_file = state.store().settings_file();
        fs::remove_file(&settings_file).unwrap();
        fs::create_dir(&settings_file).unwrap();

        assert!(handle(args(&["svc1", "--yes"]), &mut state).is_err());
        assert!(state.store().script_path("svc1").is_file());
    }
}
