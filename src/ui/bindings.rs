//! Registry of attached event handlers.
//!
//! Routing consults this set, so a handler that was never attached (or was
//! detached by `destroy`) never fires.

use crate::error::SelectorError;

/// One attached handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    TogglePointer,
    OptionPointer(String),
    ResetPointer,
    ClosePointer,
    OutsidePointer,
    EscapeKey,
    OptionNavigation,
    Shortcut,
    Resize,
    SystemPreference,
}

impl Binding {
    /// DOM-style event name the handler listens for.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::TogglePointer
            | Self::OptionPointer(_)
            | Self::ResetPointer
            | Self::ClosePointer
            | Self::OutsidePointer => "click",
            Self::EscapeKey | Self::OptionNavigation | Self::Shortcut => "keydown",
            Self::Resize => "resize",
            Self::SystemPreference => "change",
        }
    }

    /// Element the handler hangs off.
    pub fn target(&self) -> String {
        match self {
            Self::TogglePointer => "toggle".to_string(),
            Self::OptionPointer(id) => format!("option:{id}"),
            Self::ResetPointer => "reset".to_string(),
            Self::ClosePointer => "close".to_string(),
            Self::OutsidePointer | Self::EscapeKey | Self::Shortcut => "document".to_string(),
            Self::OptionNavigation => "options".to_string(),
            Self::Resize => "window".to_string(),
            Self::SystemPreference => "prefers-color-scheme".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler. Attaching the same handler twice is an
    /// `EventBinding` error and leaves the set unchanged.
    pub fn attach(&mut self, binding: Binding) -> Result<(), SelectorError> {
        if self.is_bound(&binding) {
            return Err(SelectorError::EventBinding {
                event: binding.event_name().to_string(),
                reason: format!("handler already attached to {}", binding.target()),
            });
        }
        self.bindings.push(binding);
        Ok(())
    }

    pub fn is_bound(&self, binding: &Binding) -> bool {
        self.bindings.contains(binding)
    }

    /// Detach every per-option pointer handler.
    pub fn detach_options(&mut self) -> usize {
        let before = self.bindings.len();
        self.bindings
            .retain(|binding| !matches!(binding, Binding::OptionPointer(_)));
        before - self.bindings.len()
    }

    /// Detach everything and report how many handlers were removed.
    pub fn detach_all(&mut self) -> usize {
        let count = self.bindings.len();
        self.bindings.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn duplicate_attach_is_an_event_binding_error() {
        let mut set = BindingSet::new();
        set.attach(Binding::TogglePointer).expect("first");
        let err = set.attach(Binding::TogglePointer).expect_err("duplicate");
        assert_eq!(err.kind(), ErrorKind::EventBinding);
        assert_eq!(
            err.to_string(),
            "failed to bind event \"click\": handler already attached to toggle"
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn detach_options_keeps_other_handlers() {
        let mut set = BindingSet::new();
        set.attach(Binding::OptionPointer("dark".into())).expect("dark");
        set.attach(Binding::OptionPointer("light".into())).expect("light");
        set.attach(Binding::Shortcut).expect("shortcut");
        assert_eq!(set.detach_options(), 2);
        assert!(set.is_bound(&Binding::Shortcut));
        assert_eq!(set.detach_all(), 1);
        assert!(set.is_empty());
    }
}
