//! # Handler for the `repair` command
//!
//! Loading the store already migrates legacy records and persists the result, so
//! by the time this handler runs the repair has happened. The command reports
//! what the load did, then looks for registered microservices whose launch
//! script is missing from the settings directory.
//!
//! With `--fix`, and after confirmation, the missing scripts are regenerated.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, core::store::LoadReport, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Reports the migration done on load and restores missing launch scripts."
)]
struct RepairArgs {
    /// Regenerate the launch scripts found missing.
    #[arg(long)]
    fix: bool,

    /// Do not ask before regenerating.
    #[arg(long, short, requires = "fix")]
    yes: bool,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let repair_args = RepairArgs::try_parse_from(&args)?;

    // --- Phase 1: What the load did ---
    print_load_report(state.load_report());

    // --- Phase 2: Scripts that should exist but do not ---
    let store = state.store();
    let missing: Vec<_> = state
        .ecosystem()
        .microservices
        .iter()
        .filter(|m| !store.script_path(&m.id).is_file())
        .collect();

    if missing.is_empty() {
        println!("{}", t!("repair.success.no_issues").green());
        return Ok(());
    }

    println!(
        "\n{}",
        format!(t!("repair.warning.missing_scripts"), count = missing.len()).yellow()
    );
    for microservice in &missing {
        println!(
            "  - {} {}",
            microservice.id.cyan(),
            store.script_path(&microservice.id).display().to_string().dimmed()
        );
    }

    if !repair_args.fix {
        println!("\n{}", t!("repair.info.how_to_fix").dimmed());
        return Ok(());
    }
    if !repair_args.yes && !commons::confirm(t!("repair.prompt.apply_fixes"))? {
        println!("{}", t!("common.info.aborted").yellow());
        return Ok(());
    }

    // --- Phase 3: Fix ---
    for microservice in &missing {
        store.create_script(microservice)?;
    }
    println!(
        "{}",
        format!(t!("repair.success.fixed"), count = missing.len()).green()
    );
    Ok(())
}

fn print_load_report(report: &LoadReport) {
    if report.created_store {
        println!("{}", t!("repair.info.store_created").dimmed());
    }
    if !report.migration.changed() {
        println!("{}", t!("repair.info.nothing_migrated").dimmed());
        return;
    }

    if !report.migration.regenerated.is_empty() {
        println!(
            "{}",
            format!(
                t!("repair.info.regenerated"),
                count = report.migration.regenerated.len()
            )
            .bold()
        );
        for id in &report.migration.regenerated {
            println!("  - {}", id.cyan());
        }
    }
    if !report.migration.defaulted_build_tool.is_empty() {
        println!(
            "{}",
            format!(
                t!("repair.info.defaulted_build_tool"),
                count = report.migration.defaulted_build_tool.len()
            )
            .bold()
        );
        for id in &report.migration.defaulted_build_tool {
            println!("  - {}", id.cyan());
        }
    }
    println!(
        "{}",
        format!(t!("repair.info.saves"), count = report.saves).dimmed()
    );
}
