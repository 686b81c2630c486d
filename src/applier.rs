//! Theme applier: the only writer of the global presentation scope.
//!
//! Two states, `Idle` and `Transitioning`. `apply` moves to `Transitioning`;
//! the owner calls `finish_transition` once the animation window has
//! elapsed. A second `apply` inside the window fails fast.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::catalog::ThemeCatalog;
use crate::config::{ThemeDefinition, DARK_THEME_KEY, LIGHT_THEME_KEY, SYSTEM_THEME_KEY};
use crate::error::SelectorError;
use crate::presentation::Presentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Transitioning { until: Instant },
}

/// Result of a successful `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTheme {
    pub previous: Option<String>,
    pub current: String,
    /// Key whose definition was applied (`system` resolves to light/dark).
    pub actual: String,
    pub definition: ThemeDefinition,
    /// When the transition window closes.
    pub settles_at: Instant,
}

pub struct ThemeApplier<P> {
    presentation: P,
    phase: TransitionPhase,
    current: Option<String>,
    previous: Option<String>,
    prefers_dark: bool,
    animation_duration: Duration,
    retain_stale_variables: bool,
    applied_class: Option<String>,
    applied_variables: BTreeSet<String>,
}

impl<P: Presentation> ThemeApplier<P> {
    pub fn new(
        presentation: P,
        prefers_dark: bool,
        animation_duration: Duration,
        retain_stale_variables: bool,
    ) -> Self {
        Self {
            presentation,
            phase: TransitionPhase::Idle,
            current: None,
            previous: None,
            prefers_dark,
            animation_duration,
            retain_stale_variables,
            applied_class: None,
            applied_variables: BTreeSet::new(),
        }
    }

    /// Apply `key` to the presentation scope.
    ///
    /// Fails with `NotFound` for unknown keys (including a `system` theme
    /// whose light/dark target was removed) and `AlreadyInTransition` while a
    /// previous apply is in flight. Neither failure mutates any state.
    pub fn apply(
        &mut self,
        catalog: &ThemeCatalog,
        key: &str,
        now: Instant,
    ) -> Result<AppliedTheme, SelectorError> {
        if !catalog.contains(key) {
            return Err(SelectorError::not_found(key));
        }
        if self.is_transitioning() {
            return Err(SelectorError::AlreadyInTransition);
        }
        let actual = self.resolve_actual(key).to_string();
        let definition = catalog
            .get(&actual)
            .cloned()
            .ok_or_else(|| SelectorError::not_found(&actual))?;

        let settles_at = now + self.animation_duration;
        self.phase = TransitionPhase::Transitioning { until: settles_at };
        self.previous = self.current.replace(key.to_string());

        self.swap_class(catalog, &definition.class_name);
        self.write_variables(&definition);

        info!(theme = key, actual = %actual, name = %definition.name, "theme applied");
        Ok(AppliedTheme {
            previous: self.previous.clone(),
            current: key.to_string(),
            actual,
            definition,
            settles_at,
        })
    }

    /// Return to `Idle`.
    pub fn finish_transition(&mut self) {
        if self.is_transitioning() {
            debug!("theme transition finished");
        }
        self.phase = TransitionPhase::Idle;
    }

    /// Key whose definition `key` renders with.
    pub fn resolve_actual<'a>(&self, key: &'a str) -> &'a str {
        if key == SYSTEM_THEME_KEY {
            if self.prefers_dark {
                DARK_THEME_KEY
            } else {
                LIGHT_THEME_KEY
            }
        } else {
            key
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning { .. })
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    fn swap_class(&mut self, catalog: &ThemeCatalog, class_name: &str) {
        for theme in catalog.iter() {
            if theme.class_name != class_name {
                self.presentation.remove_class(&theme.class_name);
            }
        }
        // The previous class may belong to a theme removed from the catalog.
        if let Some(stale) = self.applied_class.take() {
            if stale != class_name {
                self.presentation.remove_class(&stale);
            }
        }
        self.presentation.add_class(class_name);
        self.applied_class = Some(class_name.to_string());
    }

    fn write_variables(&mut self, definition: &ThemeDefinition) {
        if !self.retain_stale_variables {
            for stale in &self.applied_variables {
                if !definition.variables.contains_key(stale) {
                    self.presentation.remove_variable(stale);
                }
            }
            self.applied_variables.clear();
        }
        for (name, value) in &definition.variables {
            self.presentation.set_variable(name, value);
            self.applied_variables.insert(name.clone());
        }
    }
}
