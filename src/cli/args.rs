// src/cli/args.rs
use crate::models::BuildTool;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Important: the command name was already consumed by the dispatcher
pub struct AddArgs {
    /// Root directory of the microservice project.
    pub pom_location: String,

    /// Id of the microservice. A random UUID is used when omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// A human-readable name.
    #[arg(long)]
    pub name: Option<String>,

    /// Build tool: maven or gradle.
    #[arg(long, short = 'b', default_value = "maven")]
    pub build_tool: BuildTool,

    /// Extra VM arguments appended to the run command (e.g. "-Dspring.profiles.active=dev").
    #[arg(long, allow_hyphen_values = true, default_value = "")]
    pub vm_args: String,

    /// Actuator path prefix (metadata only).
    #[arg(long, default_value = "")]
    pub actuator_prefix: String,

    /// Port used by `run` when none is given.
    #[arg(long, short)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct UpdateArgs {
    /// Id of the microservice to update.
    pub id: String,

    #[arg(long)]
    pub pom_location: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'b')]
    pub build_tool: Option<BuildTool>,

    #[arg(long, allow_hyphen_values = true)]
    pub vm_args: Option<String>,

    #[arg(long)]
    pub actuator_prefix: Option<String>,

    #[arg(long, short)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// Id of the microservice to launch.
    pub id: String,

    /// Port the service listens on. Defaults to the registered port.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Maven home directory. Defaults to the stored setting.
    #[arg(long)]
    pub maven_home: Option<String>,

    /// Directory of the `mvn` binary. Defaults to `<maven-home>/bin`.
    #[arg(long)]
    pub maven_bin: Option<String>,

    /// VM arguments. Defaults to the registered ones.
    #[arg(long, allow_hyphen_values = true)]
    pub vm_args: Option<String>,

    /// Print the command instead of starting it.
    #[arg(long)]
    pub dry_run: bool,
}
