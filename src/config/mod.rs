//! Configuration module for OptiKit
//!
//! This module provides configuration management including:
//! - Project path resolution
//! - `.optikitrc` settings loading
//! - The immutable run context handed to every command

pub mod context;
pub mod paths;
pub mod settings;

pub use context::Context;
pub use paths::ProjectPaths;
pub use settings::Settings;
