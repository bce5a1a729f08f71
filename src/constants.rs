// src/constants.rs

/// Token replaced with the current OS user name inside a settings directory template.
pub const USER_NAME_TOKEN: &str = "#userName";

/// Default settings directory template on macOS hosts.
pub const DEFAULT_SETTINGS_PATH_MAC: &str = "/Users/#userName/Documents/trampoline/settings";

/// Default settings directory template on Linux and other Unix hosts.
pub const DEFAULT_SETTINGS_PATH_LINUX: &str = "/home/#userName/Documents/trampoline/settings";

/// Default settings directory template on Windows hosts.
pub const DEFAULT_SETTINGS_PATH_WINDOWS: &str = "C:\\trampoline\\settings";

/// The name of the JSON file holding the serialized ecosystem.
pub const DEFAULT_SETTINGS_FILENAME: &str = "settings.txt";

/// Extension of the placeholder template written for Windows hosts.
pub const WINDOWS_SCRIPT_EXTENSION: &str = "txt";

/// Extension of the executable shell script written for Unix hosts.
pub const UNIX_SCRIPT_EXTENSION: &str = "sh";

// Environment variables understood by the store configuration.
pub const ENV_SETTINGS_DIR: &str = "TRAMPOLINE_SETTINGS_DIR";
pub const ENV_SETTINGS_PATH_WINDOWS: &str = "TRAMPOLINE_SETTINGS_PATH_WINDOWS";
pub const ENV_SETTINGS_PATH_MAC: &str = "TRAMPOLINE_SETTINGS_PATH_MAC";
pub const ENV_SETTINGS_PATH_LINUX: &str = "TRAMPOLINE_SETTINGS_PATH_LINUX";
pub const ENV_SETTINGS_FILE: &str = "TRAMPOLINE_SETTINGS_FILE";
