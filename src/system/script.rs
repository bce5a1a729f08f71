// src/system/script.rs

use crate::{
    constants::{UNIX_SCRIPT_EXTENSION, WINDOWS_SCRIPT_EXTENSION},
    core::platform::Platform,
    models::{BuildTool, Microservice},
    system::placeholders::Placeholder,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

// Actuator flags passed to every Spring Boot run so the service can be stopped remotely.
const SHUTDOWN_FLAG: &str = "endpoints.shutdown.enabled=true";
const SECURITY_FLAG: &str = "management.security.enabled=false";

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Could not write launch script '{path}': {source}")]
    Creation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not delete launch script '{path}': {source}")]
    Removal {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path of a microservice's launch script inside the settings directory.
pub fn script_path(settings_dir: &Path, platform: Platform, id: &str) -> PathBuf {
    let extension = match platform {
        Platform::Windows => WINDOWS_SCRIPT_EXTENSION,
        Platform::Unix => UNIX_SCRIPT_EXTENSION,
    };
    settings_dir.join(format!("{}.{}", id, extension))
}

/// Renders the launch script of a microservice for the given platform.
///
/// Windows gets a one-line template with `#token` placeholders, chained with `&&`
/// so it can be handed to `cmd.exe /K`. Unix gets a shell script that reads its
/// parameters from `$1`..`$4`.
pub fn render_script(platform: Platform, microservice: &Microservice) -> String {
    match (platform, microservice.build_tool) {
        (Platform::Windows, BuildTool::Maven) => format!(
            "SET M2_HOME={home}&& SET PATH=%PATH%;{bin}&& cd {pom} && mvn spring-boot:run -Dserver.port={port} -D{f0} -D{f1} {vm}",
            home = Placeholder::MavenHomeLocation.token(),
            bin = Placeholder::MavenBinaryLocation.token(),
            pom = microservice.pom_location,
            port = Placeholder::Port.token(),
            f0 = SHUTDOWN_FLAG,
            f1 = SECURITY_FLAG,
            vm = Placeholder::VmArguments.token(),
        ),
        (Platform::Windows, BuildTool::Gradle) => format!(
            "SET server.port={port}&& SET {f0}&& SET {f1} {vm}&& cd {pom} && gradlew.bat bootRun ",
            port = Placeholder::Port.token(),
            f0 = SHUTDOWN_FLAG,
            f1 = SECURITY_FLAG,
            vm = Placeholder::VmArguments.token(),
            pom = microservice.pom_location,
        ),
        (Platform::Unix, tool) => {
            if tool != BuildTool::Maven {
                // Existing deployments only ever received the Maven command on Unix.
                log::warn!(
                    "Microservice '{}' uses {} but Unix launch scripts always run Maven.",
                    microservice.id,
                    tool
                );
            }
            format!(
                "export M2_HOME={home}; export PATH=$PATH:{bin}; cd {pom}; mvn spring-boot:run -Dserver.port={port} -D{f0} -D{f1} {vm}",
                home = Placeholder::MavenHomeLocation.positional(),
                bin = Placeholder::MavenBinaryLocation.positional(),
                pom = microservice.pom_location,
                port = Placeholder::Port.positional(),
                f0 = SHUTDOWN_FLAG,
                f1 = SECURITY_FLAG,
                vm = Placeholder::VmArguments.positional(),
            )
        }
    }
}

/// Writes (or overwrites) the launch script of a microservice and returns its path.
pub fn create_script(
    settings_dir: &Path,
    platform: Platform,
    microservice: &Microservice,
) -> Result<PathBuf, ScriptError> {
    let path = script_path(settings_dir, platform, &microservice.id);
    let content = render_script(platform, microservice);

    let creation_error = |source| ScriptError::Creation {
        path: path.display().to_string(),
        source,
    };

    fs::write(&path, content).map_err(creation_error)?;

    if platform == Platform::Unix {
        make_executable(&path).map_err(creation_error)?;
    }

    log::debug!(
        "Launch script for '{}' written to '{}'",
        microservice.id,
        path.display()
    );
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn microservice(id: &str, pom: &str, build_tool: BuildTool) -> Microservice {
        Microservice {
            id: id.to_string(),
            pom_location: pom.to_string(),
            build_tool,
            vm_arguments: String::new(),
            actuator_prefix: String::new(),
            name: None,
            default_port: None,
        }
    }

    #[test]
    fn test_unix_maven_script_uses_positional_parameters() {
        let script = render_script(Platform::Unix, &microservice("svc1", "/proj", BuildTool::Maven));
        assert_eq!(
            script,
            "export M2_HOME=$1; export PATH=$PATH:$2; cd /proj; mvn spring-boot:run -Dserver.port=$3 -Dendpoints.shutdown.enabled=true -Dmanagement.security.enabled=false $4"
        );
    }

    #[test]
    fn test_unix_gradle_script_still_runs_maven() {
        let script = render_script(Platform::Unix, &microservice("g", "/g", BuildTool::Gradle));
        assert!(script.contains("mvn spring-boot:run"));
        assert!(!script.contains("gradlew"));
    }

    #[test]
    fn test_windows_maven_template() {
        let script = render_script(Platform::Windows, &microservice("m", "C:\\proj", BuildTool::Maven));
        assert_eq!(
            script,
            "SET M2_HOME=#mavenHomeLocation&& SET PATH=%PATH%;#mavenBinaryLocation&& cd C:\\proj && mvn spring-boot:run -Dserver.port=#port -Dendpoints.shutdown.enabled=true -Dmanagement.security.enabled=false #vmArguments"
        );
    }

    #[test]
    fn test_windows_gradle_template() {
        let script = render_script(Platform::Windows, &microservice("g", "C:\\proj", BuildTool::Gradle));
        assert_eq!(
            script,
            "SET server.port=#port&& SET endpoints.shutdown.enabled=true&& SET management.security.enabled=false #vmArguments&& cd C:\\proj && gradlew.bat bootRun "
        );
    }

    #[test]
    fn test_create_script_writes_expected_file() {
        let dir = TempDir::new().unwrap();
        let ms = microservice("svc1", "/proj", BuildTool::Maven);

        let path = create_script(dir.path(), Platform::Unix, &ms).unwrap();
        assert_eq!(path, dir.path().join("svc1.sh"));

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("cd /proj;"));
        for n in 1..=4 {
            assert!(body.contains(&format!("${}", n)));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_create_script_on_windows_writes_txt_template() {
        let dir = TempDir::new().unwrap();
        let ms = microservice("svc1", "C:\\proj", BuildTool::Gradle);
        let path = create_script(dir.path(), Platform::Windows, &ms).unwrap();
        assert_eq!(path, dir.path().join("svc1.txt"));
        assert!(fs::read_to_string(path).unwrap().contains("#vmArguments"));
    }

    #[test]
    fn test_create_script_fails_when_directory_is_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let ms = microservice("svc1", "/proj", BuildTool::Maven);
        let result = create_script(&missing, Platform::Unix, &ms);
        assert!(matches!(result, Err(ScriptError::Creation { .. })));
    }
}
