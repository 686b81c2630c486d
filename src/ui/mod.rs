//! Widget controller.
//!
//! `UiController` owns the widget model, its event bindings, and the
//! transient notice. It translates raw [`UiEvent`]s into [`UiAction`]s for the
//! selector to execute; it never touches the presentation scope or storage.

pub mod bindings;
pub mod keys;
pub mod render;
pub mod widget;

use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use crate::catalog::ThemeCatalog;
use crate::config::WidgetPosition;
use crate::error::SelectorError;
use bindings::{Binding, BindingSet};
use keys::{KeyIntent, Shortcut};
use widget::{Focus, Widget};

/// Widget part a pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiTarget {
    Toggle,
    Option(String),
    Reset,
    Close,
    /// Anywhere outside the widget.
    Outside,
}

/// Input delivered to the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PointerDown(UiTarget),
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    SystemPreferenceChanged { prefers_dark: bool },
}

/// What the selector should do in response to a routed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Toggle,
    Close,
    /// Close and move focus back to the toggle.
    Dismiss,
    Select(String),
    Reset,
    MoveFocus(KeyIntent),
    Resized,
    SystemPreference(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Transient confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: NoticeLevel,
    /// False once the hide timer fired; the notice lingers until removal.
    pub visible: bool,
}

#[derive(Debug)]
pub struct UiController {
    widget: Option<Widget>,
    bindings: BindingSet,
    open: bool,
    notice: Option<Notice>,
    next_notice_id: u64,
    position: WidgetPosition,
    /// `None` when keyboard shortcuts are disabled.
    shortcut: Option<Shortcut>,
}

impl UiController {
    pub fn new(position: WidgetPosition, shortcut: Option<Shortcut>) -> Self {
        Self {
            widget: None,
            bindings: BindingSet::new(),
            open: false,
            notice: None,
            next_notice_id: 1,
            position,
            shortcut,
        }
    }

    /// Build the widget and bind its handlers. A second call is a no-op.
    pub fn build(&mut self, catalog: &ThemeCatalog, current: Option<&str>) -> Result<(), SelectorError> {
        if self.widget.is_some() {
            warn!("theme selector UI already exists");
            return Ok(());
        }
        let hint = self.shortcut.map(|shortcut| shortcut.to_string());
        let mut widget = Widget::build(catalog, self.position, hint.as_deref())?;
        widget.sync(catalog, current);
        let option_ids: Vec<String> = widget.options.iter().map(|o| o.theme_id.clone()).collect();
        self.widget = Some(widget);
        self.bind_widget_events(option_ids)?;
        info!(options = catalog.len(), "theme selector UI created");
        Ok(())
    }

    fn bind_widget_events(&mut self, option_ids: Vec<String>) -> Result<(), SelectorError> {
        self.bindings.attach(Binding::TogglePointer)?;
        for id in option_ids {
            self.bindings.attach(Binding::OptionPointer(id))?;
        }
        self.bindings.attach(Binding::ResetPointer)?;
        self.bindings.attach(Binding::ClosePointer)?;
        self.bindings.attach(Binding::OutsidePointer)?;
        self.bindings.attach(Binding::EscapeKey)?;
        self.bindings.attach(Binding::OptionNavigation)?;
        debug!(count = self.bindings.len(), "widget event handlers bound");
        Ok(())
    }

    /// Listen for OS color-scheme changes.
    pub fn bind_system_preference(&mut self) -> Result<(), SelectorError> {
        self.bindings.attach(Binding::SystemPreference)
    }

    /// Bind the toggle shortcut (when enabled) and the resize handler.
    pub fn bind_globals(&mut self) -> Result<(), SelectorError> {
        if self.shortcut.is_some() {
            self.bindings.attach(Binding::Shortcut)?;
        }
        self.bindings.attach(Binding::Resize)
    }

    /// Expand the widget and focus the first option. No-op when already
    /// open, mid-transition, or not built.
    pub fn open(&mut self, transitioning: bool) -> bool {
        if self.open || transitioning {
            return false;
        }
        let Some(widget) = self.widget.as_mut() else {
            return false;
        };
        widget.toggle.expanded = true;
        widget.options_visible = true;
        if !widget.options.is_empty() {
            widget.focus = Focus::Option(0);
        }
        self.open = true;
        info!("theme selector opened");
        true
    }

    /// Collapse the widget. No-op when already closed or mid-transition.
    pub fn close(&mut self, transitioning: bool) -> bool {
        if transitioning {
            return false;
        }
        self.force_close()
    }

    /// Collapse regardless of any transition in flight.
    pub fn force_close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        if let Some(widget) = self.widget.as_mut() {
            widget.toggle.expanded = false;
            widget.options_visible = false;
            if matches!(widget.focus, Focus::Option(_)) {
                widget.focus = Focus::None;
            }
        }
        self.open = false;
        info!("theme selector closed");
        true
    }

    pub fn focus_toggle(&mut self) {
        if let Some(widget) = self.widget.as_mut() {
            widget.focus = Focus::Toggle;
        }
    }

    pub fn move_focus(&mut self, intent: KeyIntent) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        let current = match widget.focus {
            Focus::Option(idx) => Some(idx),
            _ => None,
        };
        if let Some(idx) = keys::next_focus(current, widget.options.len(), intent) {
            widget.focus = Focus::Option(idx);
        }
    }

    /// Reflect `current` in the toggle and option list.
    pub fn sync(&mut self, catalog: &ThemeCatalog, current: Option<&str>) {
        if let Some(widget) = self.widget.as_mut() {
            widget.sync(catalog, current);
            debug!(current = ?current, "theme selector UI updated");
        }
    }

    /// Rebuild the option list after a catalog change and re-attach the
    /// per-option handlers.
    pub fn rebuild_options(
        &mut self,
        catalog: &ThemeCatalog,
        current: Option<&str>,
    ) -> Result<(), SelectorError> {
        let Some(widget) = self.widget.as_mut() else {
            return Ok(());
        };
        widget.replace_options(catalog);
        widget.sync(catalog, current);
        let option_ids: Vec<String> = widget.options.iter().map(|o| o.theme_id.clone()).collect();
        self.bindings.detach_options();
        for id in option_ids {
            self.bindings.attach(Binding::OptionPointer(id))?;
        }
        Ok(())
    }

    /// Map an input to an action, honoring only handlers that are attached.
    pub fn route(&self, event: &UiEvent) -> Option<UiAction> {
        match event {
            UiEvent::PointerDown(target) => self.route_pointer(target),
            UiEvent::Key(key) => self.route_key(key),
            UiEvent::Resize { .. } => self
                .bindings
                .is_bound(&Binding::Resize)
                .then_some(UiAction::Resized),
            UiEvent::SystemPreferenceChanged { prefers_dark } => self
                .bindings
                .is_bound(&Binding::SystemPreference)
                .then_some(UiAction::SystemPreference(*prefers_dark)),
        }
    }

    fn route_pointer(&self, target: &UiTarget) -> Option<UiAction> {
        let (binding, action) = match target {
            UiTarget::Toggle => (Binding::TogglePointer, UiAction::Toggle),
            UiTarget::Option(id) => (
                Binding::OptionPointer(id.clone()),
                UiAction::Select(id.clone()),
            ),
            UiTarget::Reset => (Binding::ResetPointer, UiAction::Reset),
            UiTarget::Close => (Binding::ClosePointer, UiAction::Close),
            UiTarget::Outside if self.open => (Binding::OutsidePointer, UiAction::Close),
            UiTarget::Outside => return None,
        };
        self.bindings.is_bound(&binding).then_some(action)
    }

    fn route_key(&self, key: &KeyEvent) -> Option<UiAction> {
        if let Some(shortcut) = &self.shortcut {
            if shortcut.matches(key) && self.bindings.is_bound(&Binding::Shortcut) {
                return Some(UiAction::Toggle);
            }
        }
        let intent = keys::classify(key)?;
        let widget = self.widget.as_ref()?;
        match intent {
            KeyIntent::Dismiss if self.open && self.bindings.is_bound(&Binding::EscapeKey) => {
                Some(UiAction::Dismiss)
            }
            KeyIntent::FocusNext
            | KeyIntent::FocusPrevious
            | KeyIntent::FocusFirst
            | KeyIntent::FocusLast
                if self.open && self.bindings.is_bound(&Binding::OptionNavigation) =>
            {
                Some(UiAction::MoveFocus(intent))
            }
            KeyIntent::Activate => match widget.focus {
                Focus::Option(_) if self.open => {
                    let id = widget.focused_option()?.theme_id.clone();
                    self.bindings
                        .is_bound(&Binding::OptionPointer(id.clone()))
                        .then_some(UiAction::Select(id))
                }
                Focus::Toggle => self
                    .bindings
                    .is_bound(&Binding::TogglePointer)
                    .then_some(UiAction::Toggle),
                _ => None,
            },
            _ => None,
        }
    }

    /// Show a notice, replacing any existing one. Returns its id for the
    /// hide/remove timers.
    pub fn show_notice(&mut self, message: impl Into<String>, level: NoticeLevel) -> u64 {
        let id = self.next_notice_id;
        self.next_notice_id += 1;
        self.notice = Some(Notice {
            id,
            message: message.into(),
            level,
            visible: true,
        });
        id
    }

    /// Start hiding notice `id`; stale ids are ignored.
    pub fn hide_notice(&mut self, id: u64) -> bool {
        match self.notice.as_mut() {
            Some(notice) if notice.id == id => {
                notice.visible = false;
                true
            }
            _ => false,
        }
    }

    pub fn remove_notice(&mut self, id: u64) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
            self.notice = None;
            return true;
        }
        false
    }

    /// Detach every handler and drop the widget. Returns the number of
    /// handlers removed; safe to call repeatedly.
    pub fn destroy(&mut self) -> usize {
        let detached = self.bindings.detach_all();
        self.widget = None;
        self.notice = None;
        self.open = false;
        detached
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }
}
