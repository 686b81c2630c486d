//! Environment overrides applied after file config resolution.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SelectorError;

use super::resolve::validate_config;
use super::SelectorConfig;

pub(super) const ENV_DEFAULT_THEME: &str = "THEME_SELECTOR_DEFAULT_THEME";
pub(super) const ENV_REMOTE_URL: &str = "THEME_SELECTOR_REMOTE_URL";
pub(super) const ENV_ANIMATION_MS: &str = "THEME_SELECTOR_ANIMATION_MS";
pub(super) const ENV_STORAGE_PATH: &str = "THEME_SELECTOR_STORAGE_PATH";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut SelectorConfig,
    env_lookup: &FEnv,
) -> Result<(), SelectorError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(theme) = non_empty(env_lookup(ENV_DEFAULT_THEME)) {
        config.default_theme = theme;
    }
    if let Some(url) = non_empty(env_lookup(ENV_REMOTE_URL)) {
        config.remote.base_url = Some(url);
    }
    if let Some(ms) = non_empty(env_lookup(ENV_ANIMATION_MS)) {
        let parsed = ms.parse::<u64>().map_err(|_| {
            SelectorError::Configuration(format!(
                "invalid {ENV_ANIMATION_MS} value `{ms}`: expected integer milliseconds"
            ))
        })?;
        config.animation_duration = Duration::from_millis(parsed);
    }
    if let Some(path) = non_empty(env_lookup(ENV_STORAGE_PATH)) {
        config.storage_path = Some(PathBuf::from(path));
    }
    // The default theme may have changed; re-check membership.
    validate_config(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = SelectorConfig::default();
        let env = lookup(&[
            (ENV_DEFAULT_THEME, "dark"),
            (ENV_REMOTE_URL, "http://localhost:8000"),
            (ENV_ANIMATION_MS, "50"),
        ]);
        apply_runtime_env_overrides(&mut config, &env).expect("apply");
        assert_eq!(config.default_theme, "dark");
        assert_eq!(
            config.remote.base_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.animation_duration, Duration::from_millis(50));
    }

    #[test]
    fn invalid_animation_value_is_rejected() {
        let mut config = SelectorConfig::default();
        let env = lookup(&[(ENV_ANIMATION_MS, "fast")]);
        let err = apply_runtime_env_overrides(&mut config, &env).expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn unknown_default_theme_from_env_is_rejected() {
        let mut config = SelectorConfig::default();
        let env = lookup(&[(ENV_DEFAULT_THEME, "neon")]);
        assert!(apply_runtime_env_overrides(&mut config, &env).is_err());
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut config = SelectorConfig::default();
        let env = lookup(&[(ENV_DEFAULT_THEME, "  ")]);
        apply_runtime_env_overrides(&mut config, &env).expect("apply");
        assert_eq!(config.default_theme, "system");
    }
}
