use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the registered microservices.")]
struct ListArgs {
    /// Also show project locations, VM arguments and actuator prefixes.
    #[arg(long, short)]
    verbose: bool,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let ecosystem = state.ecosystem();

    if ecosystem.microservices.is_empty() {
        println!("{}", t!("list.info.empty").dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(t!("list.header"), count = ecosystem.microservices.len())
            .yellow()
            .bold()
    );
    for microservice in &ecosystem.microservices {
        println!("  {}", commons::describe_microservice(microservice));
        if list_args.verbose {
            println!("      {} {}", "location:".dimmed(), microservice.pom_location);
            if !microservice.vm_arguments.is_empty() {
                println!("      {} {}", "vm args:".dimmed(), microservice.vm_arguments);
            }
            if !microservice.actuator_prefix.is_empty() {
                println!("      {} {}", "actuator:".dimmed(), microservice.actuator_prefix);
            }
        }
    }
    Ok(())
}
