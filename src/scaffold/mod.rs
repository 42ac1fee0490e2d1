//! Module scaffolding
//!
//! `generate module <name>` lays out `lib/module/<name>/` with one
//! sub-directory per [`TemplateKind`] and renders a Dart file into each.
//! Existing files are overwritten.

mod templates;

pub use templates::{class_name, TemplateKind};

use std::fs;
use std::path::PathBuf;

use regex::Regex;

use crate::config::ProjectPaths;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};
use crate::shell::DryRun;

/// Module names are lowercase snake case: `[a-z0-9_]+`
pub fn validate_module_name(name: &str) -> OptikitResult<()> {
    if name.trim().is_empty() {
        return Err(OptikitError::Validation(
            "Module name cannot be empty.".into(),
        ));
    }

    let re = Regex::new(r"^[a-z0-9_]+$")?;
    if !re.is_match(name) {
        return Err(OptikitError::Validation(
            "Module name must contain only lowercase letters, numbers, and underscores.".into(),
        ));
    }

    Ok(())
}

/// Write every template of module `name`; returns the files written
pub fn generate_module(
    paths: &ProjectPaths,
    name: &str,
    dry_run: &DryRun,
) -> OptikitResult<Vec<PathBuf>> {
    validate_module_name(name)?;

    let module_dir = paths.module_dir().join(name);
    if module_dir.exists() {
        logger::warning(format!(
            "Module {} already exists at {}",
            name,
            module_dir.display()
        ));
        logger::info("Files will be overwritten...");
    }

    logger::info(format!("Creating module structure for {}...", name));

    let mut written = Vec::new();
    for kind in TemplateKind::ALL {
        let dir = module_dir.join(kind.directory());
        let file = dir.join(kind.file_name(name));

        if dry_run.is_enabled() {
            dry_run.record_file(&format!("Create {} file", kind), &file);
            written.push(file);
            continue;
        }

        fs::create_dir_all(&dir).map_err(|e| {
            OptikitError::Io(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        fs::write(&file, kind.render(name)).map_err(|e| {
            OptikitError::Io(format!("Failed to write {}: {}", file.display(), e))
        })?;

        logger::success(format!(
            "{} file {} created in {}",
            kind,
            kind.file_name(name),
            dir.display()
        ));
        written.push(file);
    }

    logger::success(format!("Module {} created with full structure.", name));
    Ok(written)
}
