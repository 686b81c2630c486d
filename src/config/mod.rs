//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`THEME_SELECTOR_DEFAULT_THEME`,
//!    `THEME_SELECTOR_REMOTE_URL`, `THEME_SELECTOR_ANIMATION_MS`,
//!    `THEME_SELECTOR_STORAGE_PATH`)
//! 2. TOML file specified via `--config`
//! 3. `./theme-selector.toml` in the current directory
//! 4. `$XDG_CONFIG_HOME/theme-selector/config.toml` (or
//!    `~/.config/theme-selector/config.toml`)
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use crate::error::SelectorError;

mod defaults;
mod env;
mod init;
mod resolve;
mod sources;
mod types;

pub use defaults::{
    DARK_THEME_KEY, DEFAULT_SHORTCUT, DEFAULT_THEME_ICON, LIGHT_THEME_KEY, STORAGE_KEY,
    SYSTEM_THEME_KEY,
};
pub use init::{
    config_root_dir, default_config_path, default_storage_path, initialize_default_config,
    ConfigInitResult,
};
pub use resolve::resolve_config;
pub use sources::ConfigSource;
pub use types::{
    ConfigOverrides, RemoteConfig, RemoteOverrides, SelectorConfig, ThemeDefinition,
    ThemeOverride, WidgetPosition,
};

/// Resolved config plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SelectorConfig,
    pub source: ConfigSource,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&str>) -> Result<SelectorConfig, SelectorError> {
    Ok(load_config_with_source(path_override)?.config)
}

/// Load configuration and report which source supplied it.
pub fn load_config_with_source(path_override: Option<&str>) -> Result<LoadedConfig, SelectorError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, SelectorError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        sources::read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let overrides = parse_overrides(&config_text)?;
    let mut config = resolve_config(overrides)?;
    env::apply_runtime_env_overrides(&mut config, &env_lookup)?;
    Ok(LoadedConfig { config, source })
}

/// Parse TOML text into overrides without resolving them.
pub fn parse_overrides(text: &str) -> Result<ConfigOverrides, SelectorError> {
    Ok(toml::from_str(text)?)
}
