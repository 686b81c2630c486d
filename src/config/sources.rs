//! Config-file source discovery.
//!
//! Source order: explicit path > `./theme-selector.toml` > global file >
//! built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::SelectorError;

pub(super) const LOCAL_CONFIG_FILE: &str = "theme-selector.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Config loaded from explicit `--config` path.
    Explicit(PathBuf),
    /// Config loaded from `./theme-selector.toml`.
    Local,
    /// Config loaded from `<config root>/theme-selector/config.toml`.
    Global(PathBuf),
    /// No file found; built-in defaults were used.
    BuiltInDefaults,
}

/// Read config text from the highest-precedence available source.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), SelectorError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path).map_err(|e| {
            SelectorError::Configuration(format!("failed to read `{}`: {e}", path.display()))
        })?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(LOCAL_CONFIG_FILE)) {
        return Ok((text, ConfigSource::Local));
    }
    if let Some(dir) = config_root() {
        let global = global_config_path_in(&dir);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

pub(super) fn global_config_path_in(root: &Path) -> PathBuf {
    root.join("theme-selector").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn not_found(_: &Path) -> Result<String, io::Error> {
        Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
    }

    #[test]
    fn explicit_path_read_failure_is_an_error() {
        let err = read_config_text_with_sources(Some("/nope.toml"), &not_found, &|| None)
            .expect_err("explicit path must exist");
        assert!(err.to_string().contains("/nope.toml"));
    }

    #[test]
    fn falls_back_to_global_then_defaults() {
        let read = |path: &Path| {
            if path.ends_with("theme-selector/config.toml") {
                Ok("default_theme = \"dark\"".to_string())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
            }
        };
        let (text, source) =
            read_config_text_with_sources(None, &read, &|| Some(PathBuf::from("/cfg")))
                .expect("global");
        assert!(text.contains("dark"));
        assert_eq!(
            source,
            ConfigSource::Global(PathBuf::from("/cfg/theme-selector/config.toml"))
        );

        let (text, source) =
            read_config_text_with_sources(None, &not_found, &|| None).expect("defaults");
        assert!(text.is_empty());
        assert_eq!(source, ConfigSource::BuiltInDefaults);
    }
}
