//! Compile-time build metadata exposed to CLI and event surfaces.

/// Semver package version from `Cargo.toml`; also the component version tag
/// carried by every emitted event.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("THEME_SELECTOR_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("THEME_SELECTOR_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `theme-selector --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("THEME_SELECTOR_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("THEME_SELECTOR_BUILD_TIMESTAMP")
);

/// Render the CLI version block used by `theme-selector --version`.
pub fn cli_version_text() -> String {
    format!("theme-selector {VERSION}\ncommit: {GIT_COMMIT}\nbuilt: {BUILD_TIMESTAMP}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_version_text_includes_expected_lines() {
        let text = cli_version_text();
        assert!(text.starts_with("theme-selector "));
        assert!(text.contains("commit:"));
        assert!(text.contains("built:"));
    }
}
