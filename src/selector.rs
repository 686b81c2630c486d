//! `ThemeSelector`: the owned facade tying catalog, applier, persistence,
//! widget controller, notifications, and timers together.
//!
//! One value owns all selector state; every operation takes `&mut self`.
//! Deferred work (transition end, notice hide/remove) goes through the timer
//! queue and runs from [`ThemeSelector::tick`] or the async
//! [`ThemeSelector::run`] loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::api::{HttpPreferenceService, PreferenceService};
use crate::applier::{AppliedTheme, ThemeApplier};
use crate::catalog::ThemeCatalog;
use crate::config::{
    default_storage_path, SelectorConfig, ThemeDefinition, ThemeOverride, SYSTEM_THEME_KEY,
};
use crate::error::SelectorError;
use crate::events::{EventBus, EventEnvelope, SelectorEvent};
use crate::persistence::PersistenceSink;
use crate::presentation::{DocumentRoot, Presentation};
use crate::resolver::{resolve_initial_theme, Resolution};
use crate::storage::{FileStore, MemoryStore, PreferenceStore};
use crate::system::detect_prefers_dark;
use crate::timers::{TimerKind, TimerQueue};
use crate::ui::widget::Widget;
use crate::ui::{Notice, NoticeLevel, UiAction, UiController, UiEvent};

/// Collaborators injected into a selector.
pub struct SelectorDeps<P = DocumentRoot> {
    pub store: Box<dyn PreferenceStore>,
    pub remote: Option<Arc<dyn PreferenceService>>,
    pub presentation: P,
    /// OS dark-scheme preference at construction.
    pub prefers_dark: bool,
}

impl SelectorDeps<DocumentRoot> {
    /// Local-only wiring around `store`, light OS preference.
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            remote: None,
            presentation: DocumentRoot::new(),
            prefers_dark: false,
        }
    }

    /// Production wiring: file store, HTTP preference service when remote
    /// persistence is enabled and resolvable, and the OS color-scheme probe.
    pub fn from_config(config: &SelectorConfig) -> Self {
        let store: Box<dyn PreferenceStore> =
            match config.storage_path.clone().or_else(default_storage_path) {
                Some(path) => Box::new(FileStore::new(path)),
                None => {
                    warn!("no config directory for theme storage; preference will not survive restarts");
                    Box::new(MemoryStore::new())
                }
            };
        let remote = if config.enable_remote_persistence {
            match HttpPreferenceService::new(&config.remote) {
                Ok(service) => Some(Arc::new(service) as Arc<dyn PreferenceService>),
                Err(e) => {
                    info!(error = %e, "remote theme persistence disabled");
                    None
                }
            }
        } else {
            None
        };
        Self {
            store,
            remote,
            presentation: DocumentRoot::new(),
            prefers_dark: detect_prefers_dark(),
        }
    }
}

impl<P> SelectorDeps<P> {
    pub fn with_remote(mut self, remote: Arc<dyn PreferenceService>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    pub fn with_presentation<Q>(self, presentation: Q) -> SelectorDeps<Q> {
        SelectorDeps {
            store: self.store,
            remote: self.remote,
            presentation,
            prefers_dark: self.prefers_dark,
        }
    }
}

pub struct ThemeSelector<P: Presentation = DocumentRoot> {
    config: SelectorConfig,
    catalog: ThemeCatalog,
    applier: ThemeApplier<P>,
    sink: PersistenceSink,
    ui: UiController,
    events: EventBus,
    timers: TimerQueue,
    initialized: bool,
    destroyed: bool,
}

impl<P: Presentation> ThemeSelector<P> {
    /// Validate `config` and wire the collaborators. Nothing is applied
    /// until [`initialize`](Self::initialize).
    pub fn new(config: SelectorConfig, deps: SelectorDeps<P>) -> Result<Self, SelectorError> {
        let catalog = ThemeCatalog::from_definitions(config.themes.clone())?;
        if !catalog.contains(&config.default_theme) {
            return Err(SelectorError::Configuration(format!(
                "default theme `{}` is not in the catalog",
                config.default_theme
            )));
        }
        let applier = ThemeApplier::new(
            deps.presentation,
            deps.prefers_dark,
            config.animation_duration,
            config.retain_stale_variables,
        );
        let sink = PersistenceSink::new(deps.store, deps.remote, config.remember_preference);
        let shortcut = config
            .enable_keyboard_shortcuts
            .then_some(config.shortcut);
        let ui = UiController::new(config.position, shortcut);
        Ok(Self {
            config,
            catalog,
            applier,
            sink,
            ui,
            events: EventBus::new(),
            timers: TimerQueue::new(),
            initialized: false,
            destroyed: false,
        })
    }

    /// Resolve and apply the initial theme, build the widget, and bind every
    /// handler. Returns `None` (and only logs) when already initialized.
    ///
    /// A failed attempt detaches whatever it bound, so `initialize` can be
    /// retried.
    pub async fn initialize(&mut self) -> Result<Option<Resolution>, SelectorError> {
        if self.initialized {
            warn!("theme selector already initialized");
            return Ok(None);
        }
        self.destroyed = false;
        match self.try_initialize().await {
            Ok(resolution) => {
                self.initialized = true;
                self.events.emit(SelectorEvent::Initialized {
                    theme: resolution.key.clone(),
                });
                info!(theme = %resolution.key, "theme selector initialized");
                Ok(Some(resolution))
            }
            Err(e) => {
                let detached = self.ui.destroy();
                self.timers.clear();
                self.applier.finish_transition();
                warn!(error = %e, detached, "theme selector initialization failed");
                Err(e)
            }
        }
    }

    async fn try_initialize(&mut self) -> Result<Resolution, SelectorError> {
        self.ui.bind_system_preference()?;

        let resolution =
            resolve_initial_theme(&self.catalog, &self.config.default_theme, &mut self.sink)
                .await?;
        debug!(theme = %resolution.key, source = ?resolution.source, "initial theme resolved");
        self.apply_theme(&resolution.key)?;

        let current = self.applier.current().map(str::to_string);
        self.ui.build(&self.catalog, current.as_deref())?;
        self.ui.bind_globals()?;
        Ok(resolution)
    }

    /// Apply `key` now. See [`ThemeApplier::apply`] for failure modes.
    pub fn apply_theme(&mut self, key: &str) -> Result<AppliedTheme, SelectorError> {
        let applied = self.applier.apply(&self.catalog, key, Instant::now())?;
        if let Err(e) = self.sink.persist(key) {
            warn!(theme = key, error = %e, "failed to persist theme preference");
        }
        self.events.emit(SelectorEvent::ThemeChanged {
            old: applied.previous.clone(),
            new: applied.current.clone(),
            actual: applied.actual.clone(),
            definition: applied.definition.clone(),
        });
        self.timers
            .schedule(applied.settles_at, TimerKind::TransitionEnd);
        Ok(applied)
    }

    /// Apply `key`, close the widget, and show a confirmation notice.
    pub fn select_theme(&mut self, key: &str) -> Result<AppliedTheme, SelectorError> {
        let name = self
            .catalog
            .get(key)
            .map(|theme| theme.name.clone())
            .ok_or_else(|| SelectorError::not_found(key))?;
        let applied = self.apply_theme(key)?;
        if self.ui.force_close() {
            self.events.emit(SelectorEvent::Closed);
        }
        let notice = self
            .ui
            .show_notice(format!("Theme changed to {name}"), NoticeLevel::Success);
        self.timers.schedule(
            Instant::now() + self.config.auto_hide_delay,
            TimerKind::NoticeHide(notice),
        );
        Ok(applied)
    }

    /// Select the configured default theme.
    pub fn reset(&mut self) -> Result<AppliedTheme, SelectorError> {
        let default_theme = self.config.default_theme.clone();
        self.select_theme(&default_theme)
    }

    pub fn open(&mut self) -> bool {
        let opened = self.ui.open(self.applier.is_transitioning());
        if opened {
            self.events.emit(SelectorEvent::Opened);
        }
        opened
    }

    pub fn close(&mut self) -> bool {
        let closed = self.ui.close(self.applier.is_transitioning());
        if closed {
            self.events.emit(SelectorEvent::Closed);
        }
        closed
    }

    pub fn toggle(&mut self) -> bool {
        if self.ui.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Reflect the current theme in the widget.
    pub fn sync_ui(&mut self) {
        let current = self.applier.current().map(str::to_string);
        self.ui.sync(&self.catalog, current.as_deref());
    }

    /// Add or replace a theme and refresh the option list.
    pub fn add_theme(
        &mut self,
        key: &str,
        definition: Option<ThemeOverride>,
    ) -> Result<(), SelectorError> {
        self.catalog.add_theme(key, definition)?;
        self.refresh_options()
    }

    /// Remove a theme and refresh the option list. The configured default
    /// theme stays, since `reset` and startup fall back to it.
    pub fn remove_theme(&mut self, key: &str) -> Result<ThemeDefinition, SelectorError> {
        if key == self.config.default_theme {
            return Err(SelectorError::Configuration(format!(
                "cannot remove `{key}`: it is the configured default theme"
            )));
        }
        let removed = self.catalog.remove_theme(key)?;
        if self.current_theme() == Some(key) {
            warn!(theme = key, "removed the active theme; it stays applied until the next change");
        }
        self.refresh_options()?;
        Ok(removed)
    }

    fn refresh_options(&mut self) -> Result<(), SelectorError> {
        let current = self.applier.current().map(str::to_string);
        self.ui.rebuild_options(&self.catalog, current.as_deref())
    }

    /// Cache the OS preference and re-apply `system` when it is active.
    pub fn on_system_preference_changed(&mut self, prefers_dark: bool) -> Result<(), SelectorError> {
        self.applier.set_prefers_dark(prefers_dark);
        debug!(prefers_dark, "system color scheme changed");
        if self.current_theme() == Some(SYSTEM_THEME_KEY) {
            self.apply_theme(SYSTEM_THEME_KEY)?;
        }
        Ok(())
    }

    /// Route one input through the bound handlers.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), SelectorError> {
        let Some(action) = self.ui.route(&event) else {
            return Ok(());
        };
        match action {
            UiAction::Toggle => {
                self.toggle();
            }
            UiAction::Close => {
                self.close();
            }
            UiAction::Dismiss => {
                self.close();
                self.ui.focus_toggle();
            }
            UiAction::Select(key) => {
                self.select_theme(&key)?;
            }
            UiAction::Reset => {
                self.reset()?;
            }
            UiAction::MoveFocus(intent) => self.ui.move_focus(intent),
            UiAction::Resized => debug!("resize observed"),
            UiAction::SystemPreference(prefers_dark) => {
                self.on_system_preference_changed(prefers_dark)?;
            }
        }
        Ok(())
    }

    /// Run every timer due at `now`. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        if self.destroyed {
            return 0;
        }
        let mut fired = 0;
        while let Some((at, kind)) = self.timers.pop_due(now) {
            fired += 1;
            match kind {
                TimerKind::TransitionEnd => {
                    self.sync_ui();
                    self.applier.finish_transition();
                }
                TimerKind::NoticeHide(id) => {
                    if self.ui.hide_notice(id) {
                        self.timers.schedule(
                            at + self.config.animation_duration,
                            TimerKind::NoticeRemove(id),
                        );
                    }
                }
                TimerKind::NoticeRemove(id) => {
                    self.ui.remove_notice(id);
                }
            }
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Drive the selector from `events` until the channel closes or the
    /// selector is destroyed. Handler errors are logged.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        while !self.destroyed {
            let deadline = self.next_deadline();
            tokio::select! {
                received = events.recv() => match received {
                    Some(event) => {
                        if let Err(e) = self.dispatch(event) {
                            warn!(error = %e, "theme selector event failed");
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.tick(Instant::now());
                }
            }
        }
    }

    /// Wait for outstanding remote saves.
    pub async fn settle(&mut self) {
        self.sink.settle().await;
    }

    /// Detach every handler, drop the widget, cancel timers, emit
    /// `destroyed`, then drop all subscribers. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let detached = self.ui.destroy();
        self.timers.clear();
        self.applier.finish_transition();
        self.initialized = false;
        self.destroyed = true;
        self.events.emit(SelectorEvent::Destroyed);
        self.events.clear();
        info!(detached, "theme selector destroyed");
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EventEnvelope> {
        self.events.subscribe()
    }

    pub fn current_theme(&self) -> Option<&str> {
        self.applier.current()
    }

    pub fn previous_theme(&self) -> Option<&str> {
        self.applier.previous()
    }

    /// Copy of the catalog, in display order.
    pub fn themes(&self) -> Vec<ThemeDefinition> {
        self.catalog.themes()
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_open(&self) -> bool {
        self.ui.is_open()
    }

    pub fn is_transitioning(&self) -> bool {
        self.applier.is_transitioning()
    }

    pub fn prefers_dark(&self) -> bool {
        self.applier.prefers_dark()
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.sink.csrf_token()
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.ui.widget()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.ui.notice()
    }

    pub fn bound_handlers(&self) -> usize {
        self.ui.bindings().len()
    }

    pub fn presentation(&self) -> &P {
        self.applier.presentation()
    }
}
