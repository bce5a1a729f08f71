use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{state::AppState, system::launcher};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows where the settings live and the stored Maven defaults, optionally changing them."
)]
struct SettingsArgs {
    /// Store this Maven home as the default for `run`.
    #[arg(long)]
    maven_home: Option<String>,

    /// Store this directory as the default location of `mvn`.
    #[arg(long, conflicts_with = "clear_maven_bin")]
    maven_bin: Option<String>,

    /// Forget the stored binary location so it derives from the Maven home again.
    #[arg(long)]
    clear_maven_bin: bool,
}

pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let settings_args = SettingsArgs::try_parse_from(&args)?;

    let wants_change = settings_args.maven_home.is_some()
        || settings_args.maven_bin.is_some()
        || settings_args.clear_maven_bin;
    if wants_change {
        let ecosystem = state.ecosystem_mut();
        if let Some(home) = settings_args.maven_home {
            ecosystem.maven_home_location = Some(shellexpand::tilde(&home).into_owned());
        }
        if let Some(bin) = settings_args.maven_bin {
            ecosystem.maven_binary_location = Some(shellexpand::tilde(&bin).into_owned());
        }
        if settings_args.clear_maven_bin {
            ecosystem.maven_binary_location = None;
        }
        if state.needs_saving() {
            println!("{} {}", "✔".green(), t!("settings.success.updated"));
        }
    }

    let store = state.store();
    let ecosystem = state.ecosystem();
    let unset = t!("settings.value.unset").dimmed().to_string();

    println!("{}", t!("settings.header").yellow().bold());
    println!("  {:<14} {}", "directory", store.directory().display());
    println!("  {:<14} {}", "file", store.settings_file().display());
    println!("  {:<14} {}", "platform", store.platform());
    println!(
        "  {:<14} {}",
        "maven home",
        ecosystem.maven_home_location.as_deref().unwrap_or(&unset)
    );

    let binary = match (&ecosystem.maven_binary_location, &ecosystem.maven_home_location) {
        (Some(bin), _) if !bin.trim().is_empty() => bin.clone(),
        (_, Some(home)) => format!(
            "{} {}",
            launcher::resolve_binary_location(None, home),
            t!("settings.value.derived").dimmed()
        ),
        _ => unset.clone(),
    };
    println!("  {:<14} {}", "maven binary", binary);
    println!(
        "  {:<14} {}",
        "microservices",
        ecosystem.microservices.len()
    );
    println!("  {:<14} {}", "language", env!("TRAMPOLINE_LANG_EFFECTIVE"));
    Ok(())
}
