//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying operating system.
//! It serves as a boundary between the registry and the specifics of launch scripts and
//! process management on each platform.
//!
//! ## Modules
//!
//! - **`placeholders`**: The four runtime placeholders shared by the generated scripts and
//!   the launcher, with a validated, single-pass substitution.
//! - **`script`**: Renders and writes the per-microservice launch script (a command
//!   template on Windows, an executable `sh` script elsewhere).
//! - **`launcher`**: Turns a script plus runtime parameters into a command and starts it
//!   detached, in a new console on Windows.

pub mod launcher;
pub mod placeholders;
pub mod script;
