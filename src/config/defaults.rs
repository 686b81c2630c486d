//! Default configuration constants and the built-in theme catalog.
//!
//! Keeping defaults in one module lets the loader, the catalog, and tests share
//! the same literals.

use std::collections::BTreeMap;

use super::ThemeDefinition;

/// Embedded default config template written by `theme-selector init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/theme-selector.toml");
/// Pseudo-theme that mirrors the OS light/dark preference.
pub const SYSTEM_THEME_KEY: &str = "system";
/// Theme used by `system` when the OS prefers a light scheme.
pub const LIGHT_THEME_KEY: &str = "light";
/// Theme used by `system` when the OS prefers a dark scheme.
pub const DARK_THEME_KEY: &str = "dark";
/// Theme adopted when neither remote nor local storage yields a preference.
pub(super) const DEFAULT_THEME_KEY: &str = SYSTEM_THEME_KEY;
/// Fixed key under which the preference is stored locally.
pub const STORAGE_KEY: &str = "theme-selector-preference";
/// Icon used for themes that do not declare one.
pub const DEFAULT_THEME_ICON: &str = "🎨";
pub(super) const DEFAULT_ANIMATION_DURATION_MS: u64 = 300;
pub(super) const DEFAULT_AUTO_HIDE_DELAY_MS: u64 = 3000;
/// Keyboard shortcut that toggles the widget from anywhere.
pub const DEFAULT_SHORTCUT: &str = "ctrl+shift+t";
pub(super) const DEFAULT_SAVE_THEME_ENDPOINT: &str = "/api/theme/save/";
pub(super) const DEFAULT_LOAD_THEME_ENDPOINT: &str = "/api/theme/load/";
pub(super) const DEFAULT_CSRF_TOKEN_ENDPOINT: &str = "/api/csrf-token/";
pub(super) const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Built-in theme catalog, in display order.
pub(super) fn default_themes() -> Vec<ThemeDefinition> {
    vec![
        ThemeDefinition {
            id: SYSTEM_THEME_KEY.to_string(),
            name: "System Default".to_string(),
            class_name: "theme-system".to_string(),
            icon: "💻".to_string(),
            description: "Use the system default theme.".to_string(),
            variables: BTreeMap::new(),
            is_default: true,
        },
        builtin(
            LIGHT_THEME_KEY,
            "Light",
            "☀️",
            "A light theme with white backgrounds and dark text.",
            [
                "#2563eb",
                "#ffffff",
                "#f8fafc",
                "#1e293b",
                "#64748b",
                "#e2e8f0",
                "rgba(0, 0, 0, 0.08)",
            ],
        ),
        builtin(
            DARK_THEME_KEY,
            "Dark",
            "🌙",
            "A dark theme with black backgrounds and light text.",
            [
                "#3b82f6",
                "#0f172a",
                "#1e293b",
                "#f1f5f9",
                "#94a3b8",
                "#334155",
                "rgba(0, 0, 0, 0.25)",
            ],
        ),
        builtin(
            "sepia",
            "Sepia",
            "🌅",
            "A sepia theme with a brownish background and light text.",
            [
                "#f59e0b",
                "#42281f",
                "#5a3729",
                "#c4a088",
                "#947e6b",
                "#4e4339",
                "rgba(0, 0, 0, 0.15)",
            ],
        ),
        builtin(
            "blue",
            "Ocean Breeze",
            "🌊",
            "A blue theme with a calming ocean color scheme.",
            [
                "#0ea5e9",
                "#f0f9ff",
                "#e0f2fe",
                "#0c4a6e",
                "#0284c7",
                "#7dd3fc",
                "rgba(14, 165, 233, 0.15)",
            ],
        ),
        builtin(
            "green",
            "Forest Green",
            "🌲",
            "A green theme with a natural forest color scheme.",
            [
                "#10b981",
                "#f0fdf4",
                "#dcfce7",
                "#065f46",
                "#059669",
                "#6ee7b7",
                "rgba(16, 185, 129, 0.15)",
            ],
        ),
        builtin(
            "contrast",
            "High Contrast",
            "🎨",
            "A high contrast theme for better accessibility.",
            [
                "#ffff00",
                "#000000",
                "#333333",
                "#ffffff",
                "#cccccc",
                "#ffffff",
                "rgba(255, 255, 255, 0.2)",
            ],
        ),
        builtin(
            "sunset",
            "Sunset Glow",
            "🌇",
            "A warm sunset theme with orange and purple tones.",
            [
                "#f97316",
                "#fff7ed",
                "#ffedd5",
                "#9a3412",
                "#ea580c",
                "#fed7aa",
                "rgba(249, 115, 22, 0.15)",
            ],
        ),
    ]
}

/// Style variables every built-in palette defines, in palette order.
const PALETTE_VARIABLES: [&str; 7] = [
    "--theme-primary",
    "--theme-background",
    "--theme-surface",
    "--theme-text",
    "--theme-text-secondary",
    "--theme-border",
    "--theme-shadow",
];

fn builtin(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    palette: [&str; 7],
) -> ThemeDefinition {
    let variables = PALETTE_VARIABLES
        .iter()
        .zip(palette)
        .map(|(var, value)| (var.to_string(), value.to_string()))
        .collect();
    ThemeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        class_name: format!("theme-{id}"),
        icon: icon.to_string(),
        description: description.to_string(),
        variables,
        is_default: false,
    }
}
