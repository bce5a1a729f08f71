// src/system/launcher.rs

use crate::{
    core::platform::Platform,
    models::{BuildTool, Microservice},
    system::{
        placeholders::{Placeholder, SubstitutionError, Substitutions},
        script,
    },
};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Launch script '{path}' could not be read: {source}")]
    ScriptUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid launch parameters for '{id}': {source}")]
    InvalidParameter {
        id: String,
        #[source]
        source: SubstitutionError,
    },
    #[error("Command '{command}' could not be started: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Environment parameters supplied by the caller at launch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Directory holding the `mvn` executable. Derived from the home when blank.
    pub maven_binary_location: Option<String>,
    pub maven_home_location: String,
    pub port: String,
    pub vm_arguments: String,
}

impl LaunchParams {
    pub fn effective_binary_location(&self) -> String {
        resolve_binary_location(
            self.maven_binary_location.as_deref(),
            &self.maven_home_location,
        )
    }
}

/// Returns `binary` unless it is blank, in which case `<home>/bin`.
pub fn resolve_binary_location(binary: Option<&str>, home: &str) -> String {
    match binary {
        Some(b) if !b.trim().is_empty() => b.to_string(),
        _ => format!("{}/bin", home),
    }
}

/// A fully resolved process invocation, ready to be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchCommand {
    /// `cmd /c start cmd.exe /K "<command_line>"`: a new interactive console window.
    Console { command_line: String },
    /// `sh <script> <args...>`.
    Shell { script: PathBuf, args: Vec<String> },
}

impl LaunchCommand {
    /// A human-readable rendering of the invocation, for logs and CLI output.
    pub fn describe(&self) -> String {
        match self {
            Self::Console { command_line } => {
                format!("cmd /c start cmd.exe /K \"{}\"", command_line)
            }
            Self::Shell { script, args } => {
                let script = script.to_string_lossy();
                let parts = std::iter::once("sh")
                    .chain(std::iter::once(script.as_ref()))
                    .chain(args.iter().map(String::as_str));
                shlex::try_join(parts.clone())
                    .unwrap_or_else(|_| parts.collect::<Vec<_>>().join(" "))
            }
        }
    }

    fn to_command(&self) -> Command {
        match self {
            Self::Console { command_line } => {
                let mut command = Command::new("cmd");
                command.args(["/c", "start", "cmd.exe", "/K"]);
                push_console_line(&mut command, command_line);
                command
            }
            Self::Shell { script, args } => {
                let mut command = Command::new("sh");
                command.arg(dunce::simplified(script)).args(args);
                command
            }
        }
    }
}

// `cmd.exe` does its own parsing of the line after `/K`; the quotes must reach it untouched.
#[cfg(windows)]
fn push_console_line(command: &mut Command, command_line: &str) {
    use std::os::windows::process::CommandExt;
    command.raw_arg(format!("\"{}\"", command_line));
}

#[cfg(not(windows))]
fn push_console_line(command: &mut Command, command_line: &str) {
    command.arg(command_line);
}

/// Resolves the parameters and builds the command that launches a microservice,
/// without starting anything.
///
/// On Windows the previously generated template is read and its placeholders are
/// substituted. For non-Maven build tools each `-D` in the VM arguments becomes
/// `&& SET `, turning system properties into chained environment assignments.
/// On Unix the generated shell script receives the parameters positionally.
pub fn prepare_launch(
    settings_dir: &Path,
    platform: Platform,
    microservice: &Microservice,
    params: &LaunchParams,
) -> Result<LaunchCommand, LaunchError> {
    let script_path = script::script_path(settings_dir, platform, &microservice.id);
    let binary_location = params.effective_binary_location();
    let invalid = |source| LaunchError::InvalidParameter {
        id: microservice.id.clone(),
        source,
    };

    match platform {
        Platform::Windows => {
            let template = fs::read_to_string(&script_path).map_err(|e| {
                LaunchError::ScriptUnreadable {
                    path: script_path.display().to_string(),
                    source: e,
                }
            })?;

            let vm_arguments = match microservice.build_tool {
                BuildTool::Maven => params.vm_arguments.clone(),
                _ => params.vm_arguments.replace("-D", "&& SET "),
            };

            let command_line = substitutions(params, binary_location, vm_arguments)
                .apply(&template)
                .map_err(invalid)?;
            Ok(LaunchCommand::Console { command_line })
        }
        Platform::Unix => {
            if !script_path.is_file() {
                return Err(LaunchError::ScriptUnreadable {
                    path: script_path.display().to_string(),
                    source: std::io::Error::new(ErrorKind::NotFound, "launch script not found"),
                });
            }

            let args = substitutions(params, binary_location, params.vm_arguments.clone())
                .positional_args()
                .map_err(invalid)?;
            Ok(LaunchCommand::Shell {
                script: script_path,
                args,
            })
        }
    }
}

fn substitutions(params: &LaunchParams, binary_location: String, vm_arguments: String) -> Substitutions {
    Substitutions::new()
        .with(Placeholder::MavenHomeLocation, params.maven_home_location.clone())
        .with(Placeholder::MavenBinaryLocation, binary_location)
        .with(Placeholder::Port, params.port.trim())
        .with(Placeholder::VmArguments, vm_arguments)
}

/// Starts the process and returns immediately. The child is neither waited on
/// nor tracked; its output goes to the inherited stdout/stderr.
#[allow(clippy::zombie_processes)]
pub fn spawn(command: &LaunchCommand) -> Result<u32, LaunchError> {
    let description = command.describe();
    log::debug!("Spawning: {}", description);

    let child = command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| LaunchError::Spawn {
            command: description,
            source: e,
        })?;

    Ok(child.id())
}

/// Launches a microservice: resolves its launch command and spawns it.
pub fn run_script(
    settings_dir: &Path,
    platform: Platform,
    microservice: &Microservice,
    params: &LaunchParams,
) -> Result<LaunchCommand, LaunchError> {
    let command = prepare_launch(settings_dir, platform, microservice, params)?;
    let pid = spawn(&command)?;
    log::info!("Launched '{}' (PID: {})", microservice.id, pid);
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::script::create_script;
    use tempfile::TempDir;

    fn microservice(build_tool: BuildTool) -> Microservice {
        Microservice {
            id: "svc1".to_string(),
            pom_location: "/proj".to_string(),
            build_tool,
            vm_arguments: String::new(),
            actuator_prefix: String::new(),
            name: None,
            default_port: None,
        }
    }

    fn params(vm_arguments: &str) -> LaunchParams {
        LaunchParams {
            maven_binary_location: None,
            maven_home_location: "/opt/maven".to_string(),
            port: "8080".to_string(),
            vm_arguments: vm_arguments.to_string(),
        }
    }

    #[test]
    fn test_blank_binary_location_is_derived_from_home() {
        assert_eq!(resolve_binary_location(Some(""), "/opt/maven"), "/opt/maven/bin");
        assert_eq!(resolve_binary_location(Some("   "), "/opt/maven"), "/opt/maven/bin");
        assert_eq!(resolve_binary_location(None, "/opt/maven"), "/opt/maven/bin");
        assert_eq!(resolve_binary_location(Some("/usr/bin"), "/opt/maven"), "/usr/bin");
    }

    #[test]
    fn test_unix_launch_passes_resolved_positional_args() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        create_script(dir.path(), Platform::Unix, &ms).unwrap();

        let mut p = params("-Xmx1g");
        p.maven_binary_location = Some(String::new());
        let command = prepare_launch(dir.path(), Platform::Unix, &ms, &p).unwrap();

        assert_eq!(
            command,
            LaunchCommand::Shell {
                script: dir.path().join("svc1.sh"),
                args: vec![
                    "/opt/maven".to_string(),
                    "/opt/maven/bin".to_string(),
                    "8080".to_string(),
                    "-Xmx1g".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_windows_gradle_launch_rewrites_dash_d() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Gradle);
        create_script(dir.path(), Platform::Windows, &ms).unwrap();

        let command = prepare_launch(dir.path(), Platform::Windows, &ms, &params("-Dfoo=bar")).unwrap();
        let LaunchCommand::Console { command_line } = command else {
            panic!("expected a console command");
        };
        assert!(command_line.contains("&& SET foo=bar"));
        assert!(!command_line.contains("-Dfoo=bar"));
        assert!(command_line.contains("SET server.port=8080"));
        assert!(!command_line.contains('#'));
    }

    #[test]
    fn test_windows_maven_launch_keeps_vm_arguments() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        create_script(dir.path(), Platform::Windows, &ms).unwrap();

        let command = prepare_launch(dir.path(), Platform::Windows, &ms, &params("-Dfoo=bar")).unwrap();
        let LaunchCommand::Console { command_line } = command else {
            panic!("expected a console command");
        };
        assert!(command_line.starts_with("SET M2_HOME=/opt/maven&& SET PATH=%PATH%;/opt/maven/bin&& cd /proj"));
        assert!(command_line.ends_with("-Dfoo=bar"));
    }

    #[test]
    fn test_missing_script_is_reported() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        for platform in [Platform::Unix, Platform::Windows] {
            let result = prepare_launch(dir.path(), platform, &ms, &params(""));
            assert!(matches!(result, Err(LaunchError::ScriptUnreadable { .. })));
        }
    }

    #[test]
    fn test_invalid_port_is_rejected_before_spawning() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        create_script(dir.path(), Platform::Unix, &ms).unwrap();

        let mut p = params("");
        p.port = "eighty".to_string();
        let result = prepare_launch(dir.path(), Platform::Unix, &ms, &p);
        assert!(matches!(
            result,
            Err(LaunchError::InvalidParameter {
                source: SubstitutionError::InvalidPort(_),
                ..
            })
        ));
    }

    #[test]
    fn test_unix_launch_keeps_quoted_vm_arguments() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        create_script(dir.path(), Platform::Unix, &ms).unwrap();

        let vm = "-Dspring.application.name=\"svc\"";
        let command = prepare_launch(dir.path(), Platform::Unix, &ms, &params(vm)).unwrap();
        let LaunchCommand::Shell { args, .. } = command else {
            panic!("expected a shell command");
        };
        assert_eq!(args.last().map(String::as_str), Some(vm));
    }

    #[test]
    fn test_windows_launch_rejects_quoted_vm_arguments() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        create_script(dir.path(), Platform::Windows, &ms).unwrap();

        let result = prepare_launch(
            dir.path(),
            Platform::Windows,
            &ms,
            &params("-Dname=\"x\" & calc"),
        );
        assert!(matches!(
            result,
            Err(LaunchError::InvalidParameter {
                source: SubstitutionError::UnsafeValue { .. },
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_script_spawns_the_shell_script() {
        let dir = TempDir::new().unwrap();
        let ms = microservice(BuildTool::Maven);
        let script = create_script(dir.path(), Platform::Unix, &ms).unwrap();
        fs::write(&script, "exit 0\n").unwrap();

        let command = run_script(dir.path(), Platform::Unix, &ms, &params("")).unwrap();
        assert_eq!(
            command,
            LaunchCommand::Shell {
                script,
                args: vec![
                    "/opt/maven".to_string(),
                    "/opt/maven/bin".to_string(),
                    "8080".to_string(),
                    String::new(),
                ],
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_failure_names_the_command() {
        // There is no `cmd` executable on Unix hosts.
        let command = LaunchCommand::Console {
            command_line: "echo hi".to_string(),
        };
        match spawn(&command) {
            Err(LaunchError::Spawn { command, .. }) => {
                assert_eq!(command, "cmd /c start cmd.exe /K \"echo hi\"");
            }
            other => panic!("expected a spawn error, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_quotes_shell_arguments() {
        let command = LaunchCommand::Shell {
            script: PathBuf::from("/s/svc1.sh"),
            args: vec!["/opt/maven".into(), "/opt/maven/bin".into(), "8080".into(), "-Da=1 -Db=2".into()],
        };
        let described = command.describe();
        assert!(described.starts_with("sh /s/svc1.sh /opt/maven /opt/maven/bin 8080 "));
        assert_eq!(
            shlex::split(&described).unwrap(),
            ["sh", "/s/svc1.sh", "/opt/maven", "/opt/maven/bin", "8080", "-Da=1 -Db=2"]
        );
    }
}
