//! Disclosure widget model: toggle, option list, footer.
//!
//! The widget is plain data. `UiController` owns it and is the only code that
//! mutates it.

use crate::build_info;
use crate::catalog::ThemeCatalog;
use crate::config::{ThemeDefinition, WidgetPosition, DEFAULT_THEME_ICON};
use crate::error::SelectorError;

pub const WIDGET_ID: &str = "advanced-theme-selector";
pub const OPTIONS_ID: &str = "theme-options";
const TOGGLE_LABEL: &str = "Theme";

/// Which widget part holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Toggle,
    Option(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub icon: String,
    pub label: String,
    /// Tooltip naming the toggle shortcut.
    pub title: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub theme_id: String,
    pub icon: String,
    pub name: String,
    pub description: String,
    pub selected: bool,
}

impl OptionItem {
    fn from_definition(theme: &ThemeDefinition) -> Self {
        Self {
            theme_id: theme.id.clone(),
            icon: theme.icon.clone(),
            name: theme.name.clone(),
            description: theme.description.clone(),
            selected: false,
        }
    }

    /// `aria-checked` attribute value.
    pub fn aria_checked(&self) -> &'static str {
        if self.selected {
            "true"
        } else {
            "false"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub version: String,
    pub reset_label: &'static str,
    pub close_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: &'static str,
    pub class_name: String,
    pub role: &'static str,
    pub version: &'static str,
    pub toggle: ToggleControl,
    pub options: Vec<OptionItem>,
    /// Options panel visibility (the `show` class).
    pub options_visible: bool,
    pub footer: Footer,
    pub focus: Focus,
}

impl Widget {
    /// Build a collapsed widget listing every catalog entry.
    pub fn build(
        catalog: &ThemeCatalog,
        position: WidgetPosition,
        shortcut_hint: Option<&str>,
    ) -> Result<Self, SelectorError> {
        if catalog.is_empty() {
            return Err(SelectorError::Ui {
                element: OPTIONS_ID.to_string(),
                reason: "catalog has no themes to list".to_string(),
            });
        }
        let title = match shortcut_hint {
            Some(hint) => format!("Change theme ({hint})"),
            None => "Change theme".to_string(),
        };
        Ok(Self {
            id: WIDGET_ID,
            class_name: format!("theme-selector position-{}", position.as_str()),
            role: "region",
            version: build_info::VERSION,
            toggle: ToggleControl {
                icon: DEFAULT_THEME_ICON.to_string(),
                label: TOGGLE_LABEL.to_string(),
                title,
                expanded: false,
            },
            options: option_items(catalog),
            options_visible: false,
            footer: Footer {
                version: format!("v{}", build_info::VERSION),
                reset_label: "↺",
                close_label: "✕",
            },
            focus: Focus::None,
        })
    }

    /// Replace the option list from the catalog. Focus on an option that no
    /// longer exists moves to the last remaining one.
    pub fn replace_options(&mut self, catalog: &ThemeCatalog) {
        self.options = option_items(catalog);
        if let Focus::Option(idx) = self.focus {
            self.focus = match self.options.len() {
                0 => Focus::None,
                len if idx >= len => Focus::Option(len - 1),
                _ => Focus::Option(idx),
            };
        }
    }

    /// Point toggle and options at `current`. Unknown keys leave the toggle
    /// as is but still clear every option's selected flag.
    pub fn sync(&mut self, catalog: &ThemeCatalog, current: Option<&str>) {
        if let Some(theme) = current.and_then(|key| catalog.get(key)) {
            self.toggle.icon = theme.icon.clone();
            self.toggle.label = theme.name.clone();
        }
        for option in &mut self.options {
            option.selected = current == Some(option.theme_id.as_str());
        }
    }

    pub fn focused_option(&self) -> Option<&OptionItem> {
        match self.focus {
            Focus::Option(idx) => self.options.get(idx),
            _ => None,
        }
    }

    pub fn selected_option(&self) -> Option<&OptionItem> {
        self.options.iter().find(|option| option.selected)
    }
}

fn option_items(catalog: &ThemeCatalog) -> Vec<OptionItem> {
    catalog.iter().map(OptionItem::from_definition).collect()
}
