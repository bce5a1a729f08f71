use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{args::AddArgs, handlers::commons},
    core::registry::{self, NewMicroservice},
    state::AppState,
};

/// The record is saved before its script is written. A record left without a
/// script is restored by `repair --fix`.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    // 1. Parse arguments and normalize the project location.
    let add_args = AddArgs::try_parse_from(&args)?;
    let pom_location = commons::normalize_location(&add_args.pom_location);

    // 2. Register the microservice.
    let microservice = registry::add_microservice(
        state.ecosystem_mut(),
        NewMicroservice {
            id: add_args.id,
            pom_location,
            build_tool: add_args.build_tool,
            vm_arguments: add_args.vm_args,
            actuator_prefix: add_args.actuator_prefix,
            name: add_args.name,
            default_port: add_args.port.map(|p| p.to_string()),
        },
    )?;

    // 3. Persist, then generate the launch script so `run` works immediately.
    state.save_if_needed()?;
    let script = state.store().create_script(&microservice)?;
    log::debug!("Created launch script at {}", script.display());

    println!(
        "{} {}",
        "✔".green(),
        format!(t!("add.success"), id = microservice.id.cyan().bold())
    );
    println!("  {}", commons::describe_microservice(&microservice));
    println!(
        "  {}",
        format!(t!("add.info.script"), path = script.display()).dimmed()
    );
    Ok(())
}
