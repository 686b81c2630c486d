//! Configuration data model.
//!
//! This module holds struct/enum definitions plus default values. Merge and
//! validation logic lives in `config::resolve` so precedence behavior stays
//! centralized.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::ui::keys::Shortcut;

use super::defaults::{
    default_themes, DEFAULT_ANIMATION_DURATION_MS, DEFAULT_AUTO_HIDE_DELAY_MS,
    DEFAULT_CSRF_TOKEN_ENDPOINT, DEFAULT_LOAD_THEME_ENDPOINT, DEFAULT_REMOTE_TIMEOUT_SECS,
    DEFAULT_SAVE_THEME_ENDPOINT, DEFAULT_THEME_ICON, DEFAULT_THEME_KEY,
};

/// Corner the widget is anchored to.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl WidgetPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
        }
    }
}

/// One named bundle of a presentation class and style-variable overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub id: String,
    pub name: String,
    pub class_name: String,
    pub icon: String,
    pub description: String,
    /// Style variable name (`--theme-primary`) to value.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// The protected default entry. At most one per catalog.
    #[serde(default)]
    pub is_default: bool,
}

/// Partial theme definition used by config files and `add_theme`.
///
/// Unset fields keep the base value when merged into an existing theme, or
/// take the documented defaults when a new theme is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeOverride {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub variables: BTreeMap<String, String>,
    pub is_default: Option<bool>,
}

impl ThemeOverride {
    /// Merge into `base`: set fields win, variables merge per key.
    pub fn apply_to(&self, base: &mut ThemeDefinition) {
        if let Some(name) = &self.name {
            base.name = name.clone();
        }
        if let Some(class_name) = &self.class_name {
            base.class_name = class_name.clone();
        }
        if let Some(icon) = &self.icon {
            base.icon = icon.clone();
        }
        if let Some(description) = &self.description {
            base.description = description.clone();
        }
        if let Some(is_default) = self.is_default {
            base.is_default = is_default;
        }
        for (var, value) in &self.variables {
            base.variables.insert(var.clone(), value.clone());
        }
    }

    /// Build a full definition for `key`, filling unset fields with defaults.
    pub fn into_definition(self, key: &str) -> ThemeDefinition {
        ThemeDefinition {
            id: key.to_string(),
            name: self.name.unwrap_or_else(|| key.to_string()),
            class_name: self.class_name.unwrap_or_else(|| format!("theme-{key}")),
            icon: self.icon.unwrap_or_else(|| DEFAULT_THEME_ICON.to_string()),
            description: self.description.unwrap_or_default(),
            variables: self.variables,
            is_default: self.is_default.unwrap_or(false),
        }
    }
}

/// Remote preference endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Origin the endpoint paths are joined onto. Remote persistence needs it
    /// unless every endpoint is an absolute URL.
    pub base_url: Option<String>,
    pub save_theme: String,
    pub load_theme: String,
    pub csrf_token: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            save_theme: DEFAULT_SAVE_THEME_ENDPOINT.to_string(),
            load_theme: DEFAULT_LOAD_THEME_ENDPOINT.to_string(),
            csrf_token: DEFAULT_CSRF_TOKEN_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

/// Resolved selector configuration.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Catalog seed, in display order.
    pub themes: Vec<ThemeDefinition>,
    pub default_theme: String,
    pub position: WidgetPosition,
    pub remember_preference: bool,
    pub animation_duration: Duration,
    pub auto_hide_delay: Duration,
    pub enable_keyboard_shortcuts: bool,
    pub shortcut: Shortcut,
    /// Carried for compatibility; no analytics are reported.
    pub enable_analytics: bool,
    pub enable_remote_persistence: bool,
    /// Keep variables from previously applied themes instead of replacing the
    /// whole variable set.
    pub retain_stale_variables: bool,
    pub remote: RemoteConfig,
    /// Local storage file; `None` uses the default under the config root.
    pub storage_path: Option<PathBuf>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            themes: default_themes(),
            default_theme: DEFAULT_THEME_KEY.to_string(),
            position: WidgetPosition::default(),
            remember_preference: true,
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_DURATION_MS),
            auto_hide_delay: Duration::from_millis(DEFAULT_AUTO_HIDE_DELAY_MS),
            enable_keyboard_shortcuts: true,
            shortcut: Shortcut::default(),
            enable_analytics: true,
            enable_remote_persistence: true,
            retain_stale_variables: false,
            remote: RemoteConfig::default(),
            storage_path: None,
        }
    }
}

/// Caller-supplied overrides, as read from a TOML file.
///
/// Every field is optional; `themes.<key>` tables merge into built-in entries
/// or add new ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub default_theme: Option<String>,
    pub position: Option<WidgetPosition>,
    pub remember_preference: Option<bool>,
    pub animation_duration_ms: Option<u64>,
    pub auto_hide_delay_ms: Option<u64>,
    pub enable_keyboard_shortcuts: Option<bool>,
    pub shortcut: Option<String>,
    pub enable_analytics: Option<bool>,
    pub enable_remote_persistence: Option<bool>,
    pub retain_stale_variables: Option<bool>,
    pub storage_path: Option<String>,
    pub remote: RemoteOverrides,
    pub themes: BTreeMap<String, ThemeOverride>,
}

/// `[remote]` table overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteOverrides {
    pub base_url: Option<String>,
    pub save_theme: Option<String>,
    pub load_theme: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout_secs: Option<u64>,
}
