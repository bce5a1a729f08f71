use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::{args::UpdateArgs, handlers::commons},
    core::registry::{self, MicroserviceUpdate},
    state::AppState,
};

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let update_args = UpdateArgs::try_parse_from(&args)?;

    let update = MicroserviceUpdate {
        pom_location: update_args
            .pom_location
            .as_deref()
            .map(commons::normalize_location),
        build_tool: update_args.build_tool,
        vm_arguments: update_args.vm_args,
        actuator_prefix: update_args.actuator_prefix,
        name: update_args.name,
        default_port: update_args.port.map(|p| p.to_string()),
    };
    if update == MicroserviceUpdate::default() {
        return Err(anyhow!(t!("update.error.nothing_to_update")));
    }
    let regenerate = update.affects_script();

    let updated =
        registry::update_microservice(state.ecosystem_mut(), &update_args.id, update)?.clone();

    state.save_if_needed()?;
    if regenerate {
        let script = state.store().create_script(&updated)?;
        log::info!("Regenerated launch script {}", script.display());
    }

    println!(
        "{} {}",
        "✔".green(),
        format!(t!("update.success"), id = updated.id.cyan().bold())
    );
    println!("  {}", commons::describe_microservice(&updated));
    Ok(())
}
