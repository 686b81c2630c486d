//! Theme catalog: the ordered set of theme definitions the selector offers.
//!
//! Order is display order. Keys are unique and at most one entry carries the
//! `is_default` flag, which also protects it from removal.

use tracing::info;

use crate::config::{
    ThemeDefinition, ThemeOverride, DARK_THEME_KEY, LIGHT_THEME_KEY, SYSTEM_THEME_KEY,
};
use crate::error::SelectorError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeCatalog {
    themes: Vec<ThemeDefinition>,
}

impl ThemeCatalog {
    /// Build a catalog, rejecting blank or duplicate keys and multiple
    /// default entries.
    pub fn from_definitions(themes: Vec<ThemeDefinition>) -> Result<Self, SelectorError> {
        let mut catalog = Self { themes: Vec::new() };
        for theme in themes {
            if theme.id.trim().is_empty() {
                return Err(SelectorError::Configuration(
                    "theme keys must not be empty".to_string(),
                ));
            }
            if catalog.contains(&theme.id) {
                return Err(SelectorError::Configuration(format!(
                    "duplicate theme key `{}`",
                    theme.id
                )));
            }
            if theme.is_default {
                catalog.ensure_no_other_default(&theme.id)?;
            }
            catalog.themes.push(theme);
        }
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Option<&ThemeDefinition> {
        self.themes.iter().find(|theme| theme.id == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.themes.iter().position(|theme| theme.id == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|theme| theme.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Copy of every definition, in display order.
    pub fn themes(&self) -> Vec<ThemeDefinition> {
        self.themes.clone()
    }

    /// Entry flagged `is_default`, if any.
    pub fn protected_default(&self) -> Option<&ThemeDefinition> {
        self.themes.iter().find(|theme| theme.is_default)
    }

    /// Add or replace a theme, filling unset fields with defaults.
    ///
    /// A replaced entry keeps its catalog position and, unless the override
    /// sets `is_default`, its default flag.
    pub fn add_theme(
        &mut self,
        key: &str,
        definition: Option<ThemeOverride>,
    ) -> Result<(), SelectorError> {
        let key = key.trim();
        let Some(definition) = definition.filter(|_| !key.is_empty()) else {
            return Err(SelectorError::Configuration(
                "key and theme configuration are required".to_string(),
            ));
        };
        let keeps_default =
            definition.is_default.is_none() && self.get(key).is_some_and(|t| t.is_default);
        let mut theme = definition.into_definition(key);
        theme.is_default |= keeps_default;
        if theme.is_default {
            self.ensure_no_other_default(key)?;
        }

        match self.position(key) {
            Some(idx) => self.themes[idx] = theme,
            None => self.themes.push(theme),
        }
        info!(theme = key, "theme added");
        Ok(())
    }

    /// Remove a theme. The `is_default` entry cannot be removed, nor can the
    /// light and dark themes while `system` still resolves to them.
    pub fn remove_theme(&mut self, key: &str) -> Result<ThemeDefinition, SelectorError> {
        let idx = self
            .position(key)
            .ok_or_else(|| SelectorError::not_found(key))?;
        if self.themes[idx].is_default {
            return Err(SelectorError::Configuration(
                "cannot remove the default theme".to_string(),
            ));
        }
        if (key == LIGHT_THEME_KEY || key == DARK_THEME_KEY) && self.contains(SYSTEM_THEME_KEY) {
            return Err(SelectorError::Configuration(format!(
                "cannot remove `{key}` while the `{SYSTEM_THEME_KEY}` theme depends on it"
            )));
        }
        let removed = self.themes.remove(idx);
        info!(theme = key, "theme removed");
        Ok(removed)
    }

    fn ensure_no_other_default(&self, key: &str) -> Result<(), SelectorError> {
        match self.protected_default() {
            Some(existing) if existing.id != key => Err(SelectorError::Configuration(format!(
                "theme `{}` is already the default theme",
                existing.id
            ))),
            _ => Ok(()),
        }
    }
}
