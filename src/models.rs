// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- BUILD TOOL ---

/// The tool family whose run command is embedded in a generated launch script.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildTool {
    #[default]
    Maven,
    Gradle,
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maven => write!(f, "MAVEN"),
            Self::Gradle => write!(f, "GRADLE"),
        }
    }
}

impl FromStr for BuildTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maven" | "mvn" => Ok(Self::Maven),
            "gradle" => Ok(Self::Gradle),
            other => Err(format!(
                "Unknown build tool '{}'. Expected 'maven' or 'gradle'.",
                other
            )),
        }
    }
}

// --- RUNTIME MODELS ---
// These are what the rest of the application works with. Every field the
// launch logic depends on is guaranteed to be present.

/// One registered microservice, fully migrated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Microservice {
    pub id: String,
    /// Project root. Used as the working directory for every build tool.
    pub pom_location: String,
    pub build_tool: BuildTool,
    pub vm_arguments: String,
    pub actuator_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_port: Option<String>,
}

impl Microservice {
    /// Returns the name when one is set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// The full registry of microservices, persisted as one settings file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Ecosystem {
    #[serde(default)]
    pub microservices: Vec<Microservice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_home_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_binary_location: Option<String>,
}

impl Ecosystem {
    /// Creates an empty ecosystem.
    pub fn new() -> Self {
        Self::default()
    }
}

// --- ON-DISK MODELS ---
// What is read from the settings file. Older stores predate some of the
// fields, so anything added after the first release is optional here and
// only becomes mandatory through `core::migration`.

/// A microservice record exactly as found in the settings file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoredMicroservice {
    pub id: String,
    pub pom_location: String,
    #[serde(default)]
    pub build_tool: Option<BuildTool>,
    #[serde(default)]
    pub vm_arguments: Option<String>,
    #[serde(default)]
    pub actuator_prefix: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_port: Option<String>,
}

/// An ecosystem exactly as found in the settings file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoredEcosystem {
    #[serde(default)]
    pub microservices: Vec<StoredMicroservice>,
    #[serde(default)]
    pub maven_home_location: Option<String>,
    #[serde(default)]
    pub maven_binary_location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tool_serializes_as_uppercase() {
        assert_eq!(serde_json::to_string(&BuildTool::Maven).unwrap(), "\"MAVEN\"");
        assert_eq!(serde_json::to_string(&BuildTool::Gradle).unwrap(), "\"GRADLE\"");
    }

    #[test]
    fn test_build_tool_from_str_is_case_insensitive() {
        assert_eq!("Gradle".parse::<BuildTool>().unwrap(), BuildTool::Gradle);
        assert_eq!("mvn".parse::<BuildTool>().unwrap(), BuildTool::Maven);
        assert!("ant".parse::<BuildTool>().is_err());
    }

    #[test]
    fn test_legacy_record_with_missing_and_null_fields() {
        let json = r#"{
            "microservices": [
                { "id": "a", "pomLocation": "/a" },
                { "id": "b", "pomLocation": "/b", "vmArguments": null, "buildTool": null }
            ]
        }"#;
        let stored: StoredEcosystem = serde_json::from_str(json).unwrap();
        assert_eq!(stored.microservices.len(), 2);
        assert!(stored.microservices.iter().all(|m| m.vm_arguments.is_none()));
        assert!(stored.microservices.iter().all(|m| m.build_tool.is_none()));
        assert!(stored.maven_home_location.is_none());
    }

    #[test]
    fn test_optional_fields_are_not_written() {
        let ecosystem = Ecosystem {
            microservices: vec![Microservice {
                id: "svc".to_string(),
                pom_location: "/svc".to_string(),
                build_tool: BuildTool::Gradle,
                vm_arguments: String::new(),
                actuator_prefix: String::new(),
                name: None,
                default_port: None,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&ecosystem).unwrap();
        assert!(json.contains("\"pomLocation\":\"/svc\""));
        assert!(json.contains("\"buildTool\":\"GRADLE\""));
        assert!(!json.contains("defaultPort"));
        assert!(!json.contains("mavenHomeLocation"));
    }
}
