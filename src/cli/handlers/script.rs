use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{core::registry, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Regenerates the launch script of one or all microservices."
)]
struct ScriptArgs {
    /// Id of the microservice whose script is rewritten.
    #[arg(required_unless_present = "all")]
    id: Option<String>,

    /// Rewrite the scripts of every registered microservice.
    #[arg(long, conflicts_with = "id")]
    all: bool,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let script_args = ScriptArgs::try_parse_from(&args)?;
    let store = state.store();

    let targets = match &script_args.id {
        Some(id) => vec![registry::find_microservice(state.ecosystem(), id)?],
        None if script_args.all => state.ecosystem().microservices.iter().collect(),
        None => return Err(anyhow!(t!("script.error.no_target"))),
    };

    if targets.is_empty() {
        println!("{}", t!("list.info.empty").dimmed());
        return Ok(());
    }

    for microservice in targets {
        let path = store.create_script(microservice)?;
        println!(
            "{} {} {}",
            "✔".green(),
            microservice.id.cyan(),
            path.display().to_string().dimmed()
        );
    }
    Ok(())
}
