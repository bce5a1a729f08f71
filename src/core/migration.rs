//! # Migration
//!
//! Repairs records written by older releases. The settings file grew three fields
//! over time (`buildTool`, `vmArguments`, `actuatorPrefix`), and the launch scripts
//! of records that predate `vmArguments` lack the parameter placeholders the
//! current launcher relies on.
//!
//! The transform is pure: it never touches the filesystem. The returned
//! [`MigrationReport`] tells the settings store which scripts must be regenerated
//! and whether the repaired ecosystem has to be written back.

use crate::models::{BuildTool, Ecosystem, Microservice, StoredEcosystem, StoredMicroservice};

/// What a migration pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Ids of records that were missing `actuatorPrefix` or `vmArguments`.
    /// Their launch scripts must be rewritten.
    pub regenerated: Vec<String>,
    /// Ids of records whose only gap was a missing `buildTool`.
    pub defaulted_build_tool: Vec<String>,
}

impl MigrationReport {
    /// `true` when the stored ecosystem differs from the migrated one.
    pub fn changed(&self) -> bool {
        !self.regenerated.is_empty() || !self.defaulted_build_tool.is_empty()
    }
}

/// Turns a stored ecosystem into a fully populated one.
///
/// Runs in two independent passes:
/// 1. Records missing `actuatorPrefix` or `vmArguments` get both set to `""`
///    and their build tool reset to Maven, the only tool those releases knew.
/// 2. Of the remaining records, those with no `buildTool` get Maven.
///
/// Running it on an already migrated store yields an empty report.
pub fn migrate(stored: StoredEcosystem) -> (Ecosystem, MigrationReport) {
    let mut report = MigrationReport::default();

    let microservices = stored
        .microservices
        .into_iter()
        .map(|record| migrate_record(record, &mut report))
        .collect();

    let ecosystem = Ecosystem {
        microservices,
        maven_home_location: stored.maven_home_location,
        maven_binary_location: stored.maven_binary_location,
    };

    if report.changed() {
        log::debug!(
            "Migration: {} record(s) need new scripts, {} record(s) defaulted to Maven",
            report.regenerated.len(),
            report.defaulted_build_tool.len()
        );
    }

    (ecosystem, report)
}

fn migrate_record(record: StoredMicroservice, report: &mut MigrationReport) -> Microservice {
    let StoredMicroservice {
        id,
        pom_location,
        build_tool,
        vm_arguments,
        actuator_prefix,
        name,
        default_port,
    } = record;

    let (build_tool, vm_arguments, actuator_prefix) = match (vm_arguments, actuator_prefix) {
        (Some(vm), Some(prefix)) => {
            let tool = build_tool.unwrap_or_else(|| {
                report.defaulted_build_tool.push(id.clone());
                BuildTool::Maven
            });
            (tool, vm, prefix)
        }
        _ => {
            report.regenerated.push(id.clone());
            (BuildTool::Maven, String::new(), String::new())
        }
    };

    Microservice {
        id,
        pom_location,
        build_tool,
        vm_arguments,
        actuator_prefix,
        name,
        default_port,
    }
}
