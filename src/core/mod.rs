// src/core/mod.rs

pub mod migration;
pub mod paths;
pub mod platform;
pub mod registry;
pub mod store;
