//! `init` and `setup-vscode`

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use serde_json::json;

use crate::config::paths::BACKUP_DIR_NAME;
use crate::config::{Context, Settings};
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};

const GITIGNORE_ENTRY: &str = "\n# OptiKit backup files\n.optikit-backup/\n";

/// Write the default `.optikitrc.json`; returns `false` if one already exists
pub fn init_project(ctx: &Context) -> OptikitResult<bool> {
    logger::info("Initializing OptiKit in this project...");

    let paths = ctx.paths();
    let config_path = paths.config_file();
    if config_path.exists() {
        logger::warning("OptiKit configuration already exists.");
        logger::info("To reconfigure, delete .optikitrc.json and run init again.");
        return Ok(false);
    }

    let defaults = Settings::default();
    if ctx.is_dry_run() {
        ctx.dry_run().record_file("Create config", &config_path);
    } else {
        defaults.save(paths)?;
        logger::success("OptiKit initialized successfully!");
    }

    let rendered = serde_json::to_string_pretty(&defaults)?;
    println!("\nDefault configuration:\n{}", rendered);
    println!("\nYou can modify .optikitrc.json to customize these settings.\n");

    let gitignore = paths.gitignore();
    if gitignore.exists() {
        let contents = fs::read_to_string(&gitignore)?;
        if !contents.contains(BACKUP_DIR_NAME) {
            if ctx.is_dry_run() {
                ctx.dry_run().record_file("Append backup folder to", &gitignore);
            } else {
                let mut file = OpenOptions::new().append(true).open(&gitignore)?;
                file.write_all(GITIGNORE_ENTRY.as_bytes())?;
                logger::success("Added .optikit-backup/ to .gitignore");
            }
        }
    }

    Ok(true)
}

/// Recommended workspace settings for a Flutter project managed by FVM
pub fn vscode_settings() -> serde_json::Value {
    json!({
        "dart.flutterSdkPath": ".fvm/flutter_sdk",
        "editor.formatOnSave": true,
        "dart.previewFlutterUiGuides": true,
        "files.exclude": {
            "**/.git": true,
            "**/.DS_Store": true,
            "**/node_modules": true,
            "**/build": true
        }
    })
}

/// Create `.vscode/settings.json`, replacing any existing file
pub fn setup_vscode(ctx: &Context) -> OptikitResult<PathBuf> {
    let paths = ctx.paths();
    let vscode_dir = paths.vscode_dir();
    let settings_path = paths.vscode_settings();

    if ctx.is_dry_run() {
        ctx.dry_run().record_file("Write VSCode settings", &settings_path);
        return Ok(settings_path);
    }

    if vscode_dir.is_dir() {
        logger::info(".vscode directory already exists.");
    } else {
        fs::create_dir_all(&vscode_dir).map_err(|e| {
            OptikitError::Io(format!("Failed to create .vscode directory: {}", e))
        })?;
        logger::success("Created .vscode directory.");
    }

    let contents = serde_json::to_string_pretty(&vscode_settings())?;
    fs::write(&settings_path, contents)
        .map_err(|e| OptikitError::Io(format!("Failed to write VSCode settings: {}", e)))?;

    logger::success("Created .vscode/settings.json with Flutter configuration.");
    Ok(settings_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectPaths;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(root: &Path, dry_run: bool) -> Context {
        Context::new(ProjectPaths::with_root(root), Settings::default(), dry_run, false)
    }

    #[test]
    fn test_init_writes_defaults_and_gitignore() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "build/\n").unwrap();

        assert!(init_project(&context(temp.path(), false)).unwrap());

        let saved = Settings::load_from(&temp.path().join(".optikitrc.json")).unwrap();
        assert_eq!(saved, Settings::default());

        let gitignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, format!("build/\n{}", GITIGNORE_ENTRY));
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "build/\n").unwrap();
        let ctx = context(temp.path(), false);

        assert!(init_project(&ctx).unwrap());
        fs::write(temp.path().join(".optikitrc.json"), r#"{"verbose":true}"#).unwrap();
        assert!(!init_project(&ctx).unwrap());

        let config = fs::read_to_string(temp.path().join(".optikitrc.json")).unwrap();
        assert_eq!(config, r#"{"verbose":true}"#);
        let gitignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore.matches(".optikit-backup/").count(), 1);
    }

    #[test]
    fn test_init_without_gitignore_creates_none() {
        let temp = TempDir::new().unwrap();
        init_project(&context(temp.path(), false)).unwrap();
        assert!(!temp.path().join(".gitignore").exists());
    }

    #[test]
    fn test_init_dry_run() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "").unwrap();
        let ctx = context(temp.path(), true);

        init_project(&ctx).unwrap();
        assert!(!temp.path().join(".optikitrc.json").exists());
        assert_eq!(ctx.dry_run().operations().len(), 2);
    }

    #[test]
    fn test_setup_vscode() {
        let temp = TempDir::new().unwrap();
        let path = setup_vscode(&context(temp.path(), false)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, vscode_settings());
        assert_eq!(written["dart.flutterSdkPath"], ".fvm/flutter_sdk");
        assert_eq!(written["files.exclude"]["**/build"], true);
    }
}
