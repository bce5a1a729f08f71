// src/core/platform.rs

use std::fmt;

/// The operating system family of the host, as far as settings location is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
}

/// The launch variant. Every component below the entry point receives this tag
/// instead of querying the running OS itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Placeholder templates, launched in a new `cmd.exe` console.
    Windows,
    /// Executable shell scripts with positional parameters.
    Unix,
}

impl HostOs {
    /// Detects the host the binary was compiled for.
    /// Any non-Windows, non-macOS target is treated as Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    pub fn platform(self) -> Platform {
        match self {
            Self::Windows => Platform::Windows,
            Self::MacOs | Self::Linux => Platform::Unix,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "windows (cmd.exe)"),
            Self::Unix => write!(f, "unix (sh)"),
        }
    }
}
