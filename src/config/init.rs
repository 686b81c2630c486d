//! Config-path helpers and default config initialization.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SelectorError;

use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::sources::global_config_path_in;

/// Outcome of `initialize_default_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}

/// Return the default per-user config path
/// (`~/.config/theme-selector/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| global_config_path_in(&dir))
}

/// Return the default local storage file
/// (`~/.config/theme-selector/storage.json`).
pub fn default_storage_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join("theme-selector").join("storage.json"))
}

/// Write the commented template config.
///
/// Without `force`, an existing file is left alone. With `force`, the
/// existing file is copied to `<name>.bak` first.
pub fn initialize_default_config(
    path_override: Option<&str>,
    force: bool,
) -> Result<ConfigInitResult, SelectorError> {
    let path = match path_override {
        Some(path) => PathBuf::from(path),
        None => default_config_path().ok_or_else(|| {
            SelectorError::Configuration("unable to resolve the config directory".to_string())
        })?,
    };
    initialize_config_at_path(&path, force)
        .map_err(|e| SelectorError::Configuration(format!("{}: {e}", path.display())))
}

fn initialize_config_at_path(path: &Path, force: bool) -> std::io::Result<ConfigInitResult> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        if !force {
            return Ok(ConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let backup_path = backup_path_for(path);
        std::fs::copy(path, &backup_path)?;
        std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        return Ok(ConfigInitResult::Overwritten {
            path: path.to_path_buf(),
            backup_path,
        });
    }

    // create_new avoids clobbering a file another process created meanwhile.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())?;
            Ok(ConfigInitResult::Created {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(ConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(e),
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.toml".to_string());
    path.with_file_name(format!("{file_name}.bak"))
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
