// src/system/placeholders.rs

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"#(mavenBinaryLocation|mavenHomeLocation|port|vmArguments)")
            .expect("placeholder pattern is valid");
}

/// A runtime parameter of a launch script.
///
/// Windows templates carry it as a `#name` token that is replaced textually
/// before launch. Unix scripts receive it as a positional shell parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    MavenHomeLocation,
    MavenBinaryLocation,
    Port,
    VmArguments,
}

impl Placeholder {
    /// All placeholders, in the order of their positional parameters.
    pub const ALL: [Self; 4] = [
        Self::MavenHomeLocation,
        Self::MavenBinaryLocation,
        Self::Port,
        Self::VmArguments,
    ];

    /// The token used in Windows templates.
    pub fn token(self) -> &'static str {
        match self {
            Self::MavenHomeLocation => "#mavenHomeLocation",
            Self::MavenBinaryLocation => "#mavenBinaryLocation",
            Self::Port => "#port",
            Self::VmArguments => "#vmArguments",
        }
    }

    /// The 1-based shell parameter index used in Unix scripts.
    pub fn position(self) -> usize {
        match self {
            Self::MavenHomeLocation => 1,
            Self::MavenBinaryLocation => 2,
            Self::Port => 3,
            Self::VmArguments => 4,
        }
    }

    /// The shell parameter reference (`$1`..`$4`).
    pub fn positional(self) -> String {
        format!("${}", self.position())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.token().strip_prefix('#') == Some(name))
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("No value provided for '{0}'.")]
    Missing(Placeholder),
    #[error("'{0}' is not a valid port. Expected a number between 1 and 65535.")]
    InvalidPort(String),
    #[error("Value for '{placeholder}' contains a line break or a double quote: '{value}'")]
    UnsafeValue {
        placeholder: Placeholder,
        value: String,
    },
}

/// A validated mapping from placeholders to their runtime values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<Placeholder, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    /// Checks that every placeholder has a value and that the port is usable.
    pub fn validate(&self) -> Result<(), SubstitutionError> {
        for placeholder in Placeholder::ALL {
            if !self.values.contains_key(&placeholder) {
                return Err(SubstitutionError::Missing(placeholder));
            }
        }

        let port = self.get(Placeholder::Port).unwrap_or_default();
        match port.trim().parse::<u16>() {
            Ok(p) if p > 0 => Ok(()),
            _ => Err(SubstitutionError::InvalidPort(port.to_string())),
        }
    }

    /// Values spliced into a quoted console line must not close the quote or
    /// start a new command.
    fn validate_inline(&self) -> Result<(), SubstitutionError> {
        match self
            .values
            .iter()
            .find(|(_, value)| value.contains(['\n', '\r', '"']))
        {
            Some((placeholder, value)) => Err(SubstitutionError::UnsafeValue {
                placeholder: *placeholder,
                value: value.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Replaces every placeholder token in `template` in a single pass.
    /// Values are inserted verbatim and never rescanned for tokens.
    pub fn apply(&self, template: &str) -> Result<String, SubstitutionError> {
        self.validate()?;
        self.validate_inline()?;
        let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|m| Placeholder::from_name(m.as_str()))
                .and_then(|p| self.get(p))
                .unwrap_or_default()
                .to_string()
        });
        Ok(rendered.into_owned())
    }

    /// Returns the values in positional order (`$1`..`$4`). Each one becomes a
    /// separate process argument, so quotes and line breaks are kept as given.
    pub fn positional_args(&self) -> Result<Vec<String>, SubstitutionError> {
        self.validate()?;
        Ok(Placeholder::ALL
            .into_iter()
            .map(|p| self.get(p).unwrap_or_default().to_string())
            .collect())
    }
}
