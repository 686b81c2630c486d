//! OS color-scheme probe.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use tracing::debug;

/// True when the OS reports a dark color scheme.
///
/// Undetectable platforms report light.
pub fn detect_prefers_dark() -> bool {
    let prefers_dark = matches!(detect_os_theme(), OsThemeMode::Dark);
    debug!(prefers_dark, "detected OS color scheme");
    prefers_dark
}
