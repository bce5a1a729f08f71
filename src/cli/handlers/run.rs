use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::RunArgs,
    core::registry,
    models::{Ecosystem, Microservice},
    state::AppState,
    system::launcher::{self, LaunchError, LaunchParams},
};

///
/// Main entry point for the 'run' command.
/// Flags win over the values registered for the microservice, which win over
/// the ecosystem-wide Maven settings.
///
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let ecosystem = state.ecosystem();
    let microservice = registry::find_microservice(ecosystem, &run_args.id)?;
    let dry_run = run_args.dry_run;

    let params = resolve_params(run_args, microservice, ecosystem)?;
    log::debug!("Launch parameters for '{}': {:?}", microservice.id, params);

    let store = state.store();
    let result = if dry_run {
        launcher::prepare_launch(store.directory(), store.platform(), microservice, &params)
    } else {
        launcher::run_script(store.directory(), store.platform(), microservice, &params)
    };

    let command = match result {
        Ok(command) => command,
        Err(e @ LaunchError::ScriptUnreadable { .. }) => {
            return Err(anyhow::Error::new(e).context(format!(
                t!("run.error.script_missing"),
                id = microservice.id
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if dry_run {
        println!("{}", command.describe());
    } else {
        println!(
            "{} {}",
            "▶".green(),
            format!(
                t!("run.success.launched"),
                id = microservice.id.cyan().bold(),
                port = params.port.yellow()
            )
        );
        println!("  {}", command.describe().dimmed());
    }
    Ok(())
}

fn resolve_params(
    run_args: RunArgs,
    microservice: &Microservice,
    ecosystem: &Ecosystem,
) -> Result<LaunchParams> {
    let port = run_args
        .port
        .map(|p| p.to_string())
        .or_else(|| microservice.default_port.clone())
        .ok_or_else(|| anyhow!(t!("run.error.no_port"), id = microservice.id))?;

    let maven_home_location = run_args
        .maven_home
        .or_else(|| ecosystem.maven_home_location.clone())
        .map(|home| shellexpand::tilde(&home).into_owned())
        .ok_or_else(|| anyhow!(t!("run.error.no_maven_home")))?;

    let maven_binary_location = run_args
        .maven_bin
        .or_else(|| ecosystem.maven_binary_location.clone())
        .map(|bin| shellexpand::tilde(&bin).into_owned());

    Ok(LaunchParams {
        maven_binary_location,
        maven_home_location,
        port,
        vm_arguments: run_args
            .vm_args
            .unwrap_or_else(|| microservice.vm_arguments.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuildTool;

    fn microservice() -> Microservice {
        Microservice {
            id: "svc1".to_string(),
            pom_location: "/proj".to_string(),
            build_tool: BuildTool::Maven,
            vm_arguments: "-Dregistered=1".to_string(),
            actuator_prefix: String::new(),
            name: None,
            default_port: Some("8081".to_string()),
        }
    }

    fn ecosystem() -> Ecosystem {
        Ecosystem {
            maven_home_location: Some("/opt/maven".to_string()),
            ..Ecosystem::new()
        }
    }

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut args = vec!["svc1"];
        args.extend_from_slice(extra);
        RunArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_registered_values_are_used_as_fallbacks() {
        let params = resolve_params(run_args(&[]), &microservice(), &ecosystem()).unwrap();
        assert_eq!(params.port, "8081");
        assert_eq!(params.maven_home_location, "/opt/maven");
        assert_eq!(params.maven_binary_location, None);
        assert_eq!(params.vm_arguments, "-Dregistered=1");
    }

    #[test]
    fn test_flags_override_registered_values() {
        let args = run_args(&[
            "--port",
            "9000",
            "--maven-home",
            "/usr/share/maven",
            "--maven-bin",
            "/usr/bin",
            "--vm-args",
            "-Dflag=2",
        ]);
        let params = resolve_params(args, &microservice(), &ecosystem()).unwrap();
        assert_eq!(params.port, "9000");
        assert_eq!(params.maven_home_location, "/usr/share/maven");
        assert_eq!(params.maven_binary_location.as_deref(), Some("/usr/bin"));
        assert_eq!(params.vm_arguments, "-Dflag=2");
    }

    #[test]
    fn test_missing_port_and_home_are_errors() {
        let mut ms = microservice();
        ms.default_port = None;
        assert!(resolve_params(run_args(&[]), &ms, &ecosystem()).is_err());
        assert!(resolve_params(run_args(&[]), &microservice(), &Ecosystem::new()).is_err());
    }
}
