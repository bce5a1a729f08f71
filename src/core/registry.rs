use crate::models::{BuildTool, Ecosystem, Microservice};
use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur while editing the microservices of an ecosystem.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A microservice with the requested id is already registered.
    #[error("A microservice with id '{id}' is already registered.")]
    AlreadyExists {
        /// The conflicting id.
        id: String,
    },
    /// No microservice with the requested id exists.
    #[error("Microservice '{id}' not found.")]
    NotFound {
        /// The id that was not found.
        id: String,
    },
    /// The id cannot be used as a script file name.
    #[error("Invalid microservice id '{id}': ids may only contain letters, digits, '-', '_' and '.'.")]
    InvalidId {
        /// The rejected id.
        id: String,
    },
}

type RegistryResult<T> = Result<T, RegistryError>;

/// The data needed to register a new microservice.
#[derive(Debug, Clone, Default)]
pub struct NewMicroservice {
    /// When `None`, a random UUID is assigned.
    pub id: Option<String>,
    pub pom_location: String,
    pub build_tool: BuildTool,
    pub vm_arguments: String,
    pub actuator_prefix: String,
    pub name: Option<String>,
    pub default_port: Option<String>,
}

/// A partial update. Only the fields set to `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MicroserviceUpdate {
    pub pom_location: Option<String>,
    pub build_tool: Option<BuildTool>,
    pub vm_arguments: Option<String>,
    pub actuator_prefix: Option<String>,
    pub name: Option<String>,
    pub default_port: Option<String>,
}

impl MicroserviceUpdate {
    /// `true` if the update touches a field that is baked into the launch script.
    pub fn affects_script(&self) -> bool {
        self.pom_location.is_some() || self.build_tool.is_some()
    }
}

/// Finds a microservice by id.
pub fn find_microservice<'a>(ecosystem: &'a Ecosystem, id: &str) -> RegistryResult<&'a Microservice> {
    ecosystem
        .microservices
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
}

/// Adds a new microservice to the ecosystem and returns a copy of the stored record.
///
/// # Errors
/// Returns `RegistryError::AlreadyExists` if the id is taken, and
/// `RegistryError::InvalidId` if it could not be used as a file name.
pub fn add_microservice(
    ecosystem: &mut Ecosystem,
    new: NewMicroservice,
) -> RegistryResult<Microservice> {
    let id = match new.id {
        Some(id) => validate_id(id.trim())?,
        None => Uuid::new_v4().to_string(),
    };

    if ecosystem.microservices.iter().any(|m| m.id == id) {
        return Err(RegistryError::AlreadyExists { id });
    }

    let microservice = Microservice {
        id,
        pom_location: new.pom_location,
        build_tool: new.build_tool,
        vm_arguments: new.vm_arguments,
        actuator_prefix: new.actuator_prefix,
        name: new.name,
        default_port: new.default_port,
    };
    log::debug!("Registering microservice '{}'", microservice.id);
    ecosystem.microservices.push(microservice.clone());
    Ok(microservice)
}

/// Applies a partial update to an existing microservice.
pub fn update_microservice<'a>(
    ecosystem: &'a mut Ecosystem,
    id: &str,
    update: MicroserviceUpdate,
) -> RegistryResult<&'a Microservice> {
    let microservice = ecosystem
        .microservices
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;

    if let Some(v) = update.pom_location {
        microservice.pom_location = v;
    }
    if let Some(v) = update.build_tool {
        microservice.build_tool = v;
    }
    if let Some(v) = update.vm_arguments {
        microservice.vm_arguments = v;
    }
    if let Some(v) = update.actuator_prefix {
        microservice.actuator_prefix = v;
    }
    if let Some(v) = update.name {
        microservice.name = Some(v);
    }
    if let Some(v) = update.default_port {
        microservice.default_port = Some(v);
    }
    Ok(microservice)
}

/// Removes a microservice and returns it.
pub fn remove_microservice(ecosystem: &mut Ecosystem, id: &str) -> RegistryResult<Microservice> {
    let position = ecosystem
        .microservices
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;
    Ok(ecosystem.microservices.remove(position))
}

/// Ids double as script file names, so anything that could escape the settings
/// directory or confuse a shell is refused.
pub(crate) fn validate_id(id: &str) -> RegistryResult<String> {
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(id.to_string())
    } else {
        Err(RegistryError::InvalidId { id: id.to_string() })
    }
}
