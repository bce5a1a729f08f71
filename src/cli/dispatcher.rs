use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::{cli::handlers, state::AppState};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &["new"],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "repair",
        aliases: &[],
        handler: handlers::repair::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["start"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "script",
        aliases: &[],
        handler: handlers::script::handle,
    },
    CommandDefinition {
        name: "settings",
        aliases: &[],
        handler: handlers::settings::handle,
    },
    CommandDefinition {
        name: "update",
        aliases: &["edit"],
        handler: handlers::update::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `<command> [args...]` to its handler.
pub fn dispatch(all_args: Vec<String>, state: &mut AppState) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(command_name) = args.next() else {
        println!("{}", t!("dispatch.info.no_command").dimmed());
        return Ok(());
    };

    let command = find_command(&command_name)
        .ok_or_else(|| anyhow!(t!("dispatch.error.unknown_command"), name = command_name))?;

    (command.handler)(args.collect(), state)
}
