//! Merge caller overrides into the built-in configuration.
//!
//! Overrides win per field. Theme tables merge per field and their
//! `variables` maps merge per key, so an override that only changes
//! `--theme-primary` keeps every other built-in variable.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::ThemeCatalog;
use crate::error::SelectorError;
use crate::ui::keys::Shortcut;

use super::{ConfigOverrides, SelectorConfig};

/// Build a validated configuration from built-in defaults plus `overrides`.
pub fn resolve_config(overrides: ConfigOverrides) -> Result<SelectorConfig, SelectorError> {
    let mut config = SelectorConfig::default();
    merge_overrides(&mut config, overrides)?;
    validate_config(&config)?;
    Ok(config)
}

pub(super) fn merge_overrides(
    config: &mut SelectorConfig,
    overrides: ConfigOverrides,
) -> Result<(), SelectorError> {
    for (raw_key, theme_override) in overrides.themes {
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(SelectorError::Configuration(
                "theme keys must not be empty".to_string(),
            ));
        }
        match config.themes.iter_mut().find(|theme| theme.id == key) {
            Some(existing) => theme_override.apply_to(existing),
            None => config.themes.push(theme_override.into_definition(key)),
        }
    }

    if let Some(default_theme) = overrides.default_theme {
        config.default_theme = default_theme.trim().to_string();
    }
    if let Some(position) = overrides.position {
        config.position = position;
    }
    if let Some(remember) = overrides.remember_preference {
        config.remember_preference = remember;
    }
    if let Some(ms) = overrides.animation_duration_ms {
        config.animation_duration = Duration::from_millis(ms);
    }
    if let Some(ms) = overrides.auto_hide_delay_ms {
        config.auto_hide_delay = Duration::from_millis(ms);
    }
    if let Some(enabled) = overrides.enable_keyboard_shortcuts {
        config.enable_keyboard_shortcuts = enabled;
    }
    if let Some(shortcut) = overrides.shortcut {
        config.shortcut = Shortcut::parse(&shortcut)?;
    }
    if let Some(enabled) = overrides.enable_analytics {
        config.enable_analytics = enabled;
    }
    if let Some(enabled) = overrides.enable_remote_persistence {
        config.enable_remote_persistence = enabled;
    }
    if let Some(retain) = overrides.retain_stale_variables {
        config.retain_stale_variables = retain;
    }
    if let Some(path) = overrides.storage_path {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            config.storage_path = Some(PathBuf::from(trimmed));
        }
    }

    let remote = overrides.remote;
    if let Some(base_url) = remote.base_url {
        let trimmed = base_url.trim();
        config.remote.base_url = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    if let Some(save_theme) = remote.save_theme {
        config.remote.save_theme = save_theme;
    }
    if let Some(load_theme) = remote.load_theme {
        config.remote.load_theme = load_theme;
    }
    if let Some(csrf_token) = remote.csrf_token {
        config.remote.csrf_token = csrf_token;
    }
    if let Some(timeout) = remote.timeout_secs {
        // Zero would disable the request timeout entirely.
        config.remote.timeout_secs = timeout.max(1);
    }
    Ok(())
}

/// Check cross-field invariants: catalog shape and default key membership.
pub(super) fn validate_config(config: &SelectorConfig) -> Result<(), SelectorError> {
    let catalog = ThemeCatalog::from_definitions(config.themes.clone())?;
    if !catalog.contains(&config.default_theme) {
        return Err(SelectorError::Configuration(format!(
            "default theme `{}` is not in the catalog",
            config.default_theme
        )));
    }
    Ok(())
}
