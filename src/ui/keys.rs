//! Keyboard handling: the global toggle shortcut and option-focus movement.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::SelectorError;

/// Modifier chord plus one character, e.g. `ctrl+shift+t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    ctrl: bool,
    shift: bool,
    alt: bool,
    key: char,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self {
            ctrl: true,
            shift: true,
            alt: false,
            key: 't',
        }
    }
}

impl Shortcut {
    /// Parse `modifier+...+key`. Modifiers are `ctrl`/`control`, `shift`,
    /// `alt`/`option`; the key must be a single ASCII letter or digit.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let invalid = |why: &str| SelectorError::Configuration(format!("shortcut `{text}`: {why}"));

        let parts: Vec<String> = text
            .split('+')
            .map(|part| part.trim().to_ascii_lowercase())
            .collect();
        let Some((key, modifiers)) = parts.split_last() else {
            return Err(invalid("empty"));
        };

        let mut shortcut = Self {
            ctrl: false,
            shift: false,
            alt: false,
            key: ' ',
        };
        for modifier in modifiers {
            match modifier.as_str() {
                "ctrl" | "control" => shortcut.ctrl = true,
                "shift" => shortcut.shift = true,
                "alt" | "option" => shortcut.alt = true,
                "" => return Err(invalid("empty modifier")),
                other => return Err(invalid(&format!("unknown modifier `{other}`"))),
            }
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphanumeric() => shortcut.key = ch,
            (None, _) => return Err(invalid("missing key")),
            _ => return Err(invalid(&format!("unsupported key `{key}`"))),
        }
        if !(shortcut.ctrl || shortcut.alt) {
            return Err(invalid("needs ctrl or alt"));
        }
        Ok(shortcut)
    }

    /// True when `event` is this chord. Terminals report shifted letters as
    /// uppercase with or without the SHIFT flag, so both count as shift.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let KeyCode::Char(ch) = event.code else {
            return false;
        };
        let shift = event.modifiers.contains(KeyModifiers::SHIFT) || ch.is_ascii_uppercase();
        ch.to_ascii_lowercase() == self.key
            && event.modifiers.contains(KeyModifiers::CONTROL) == self.ctrl
            && event.modifiers.contains(KeyModifiers::ALT) == self.alt
            && shift == self.shift
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// What a key press means to an open widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    FocusNext,
    FocusPrevious,
    FocusFirst,
    FocusLast,
    Activate,
    Dismiss,
}

pub fn classify(event: &KeyEvent) -> Option<KeyIntent> {
    match event.code {
        KeyCode::Down => Some(KeyIntent::FocusNext),
        KeyCode::Up => Some(KeyIntent::FocusPrevious),
        KeyCode::Home => Some(KeyIntent::FocusFirst),
        KeyCode::End => Some(KeyIntent::FocusLast),
        KeyCode::Enter | KeyCode::Char(' ') => Some(KeyIntent::Activate),
        KeyCode::Esc => Some(KeyIntent::Dismiss),
        _ => None,
    }
}

/// Option index that receives focus after a movement intent.
///
/// With nothing focused, `FocusNext` lands on the first option and
/// `FocusPrevious` on the last. Returns `current` for non-movement intents
/// and `None` for an empty list.
pub fn next_focus(current: Option<usize>, len: usize, intent: KeyIntent) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (intent, current) {
        (KeyIntent::FocusNext, Some(idx)) => (idx + 1) % len,
        (KeyIntent::FocusNext, None) => 0,
        (KeyIntent::FocusPrevious, Some(idx)) => (idx + len - 1) % len,
        // Wraps from an implicit -1 to the last option, not the one before it.
        (KeyIntent::FocusPrevious, None) => len - 1,
        (KeyIntent::FocusFirst, _) => 0,
        (KeyIntent::FocusLast, _) => len - 1,
        (KeyIntent::Activate | KeyIntent::Dismiss, current) => return current,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SHORTCUT;
    use crate::error::ErrorKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_matches_the_documented_chord() {
        let parsed = Shortcut::parse(DEFAULT_SHORTCUT).expect("default parses");
        assert_eq!(parsed, Shortcut::default());
        assert_eq!(parsed.to_string(), DEFAULT_SHORTCUT);
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        let parsed = Shortcut::parse(" Control + Alt + K ").expect("parse");
        assert_eq!(parsed.to_string(), "ctrl+alt+k");
    }

    #[test]
    fn parse_rejects_malformed_chords() {
        for bad in ["", "ctrl+", "t", "ctrl+shift+tab", "hyper+t", "ctrl++t", "shift+t"] {
            let err = Shortcut::parse(bad).expect_err(bad);
            assert_eq!(err.kind(), ErrorKind::Configuration, "{bad}");
        }
    }

    #[test]
    fn matches_upper_and_lower_case_reports() {
        let shortcut = Shortcut::default();
        let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert!(shortcut.matches(&key(KeyCode::Char('T'), ctrl_shift)));
        assert!(shortcut.matches(&key(KeyCode::Char('t'), ctrl_shift)));
        assert!(shortcut.matches(&key(KeyCode::Char('T'), KeyModifiers::CONTROL)));
        assert!(!shortcut.matches(&key(KeyCode::Char('t'), KeyModifiers::CONTROL)));
        assert!(!shortcut.matches(&key(KeyCode::Char('T'), KeyModifiers::SHIFT)));
        assert!(!shortcut.matches(&key(KeyCode::Enter, ctrl_shift)));
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        assert_eq!(next_focus(Some(7), 8, KeyIntent::FocusNext), Some(0));
        assert_eq!(next_focus(Some(0), 8, KeyIntent::FocusPrevious), Some(7));
        assert_eq!(next_focus(Some(3), 8, KeyIntent::FocusPrevious), Some(2));
        assert_eq!(next_focus(None, 8, KeyIntent::FocusNext), Some(0));
        assert_eq!(next_focus(None, 8, KeyIntent::FocusPrevious), Some(7));
    }

    #[test]
    fn home_end_and_empty_lists() {
        assert_eq!(next_focus(Some(4), 8, KeyIntent::FocusFirst), Some(0));
        assert_eq!(next_focus(Some(4), 8, KeyIntent::FocusLast), Some(7));
        assert_eq!(next_focus(Some(4), 8, KeyIntent::Activate), Some(4));
        assert_eq!(next_focus(None, 0, KeyIntent::FocusNext), None);
    }

    #[test]
    fn classify_maps_navigation_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(classify(&key(KeyCode::Down, none)), Some(KeyIntent::FocusNext));
        assert_eq!(classify(&key(KeyCode::Char(' '), none)), Some(KeyIntent::Activate));
        assert_eq!(classify(&key(KeyCode::Esc, none)), Some(KeyIntent::Dismiss));
        assert_eq!(classify(&key(KeyCode::Char('x'), none)), None);
    }

    #[cfg(feature = "fuzz-tests")]
    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn focus_stays_in_bounds(len in 1usize..64, start in proptest::option::of(0usize..64), steps in proptest::collection::vec(0u8..4, 0..32)) {
                let mut current = start.map(|idx| idx % len);
                for step in steps {
                    let intent = match step {
                        0 => KeyIntent::FocusNext,
                        1 => KeyIntent::FocusPrevious,
                        2 => KeyIntent::FocusFirst,
                        _ => KeyIntent::FocusLast,
                    };
                    current = next_focus(current, len, intent);
                    prop_assert!(current.is_some_and(|idx| idx < len));
                }
            }

            #[test]
            fn next_then_previous_is_identity(len in 1usize..64, idx in 0usize..64) {
                let idx = idx % len;
                let there = next_focus(Some(idx), len, KeyIntent::FocusNext);
                prop_assert_eq!(next_focus(there, len, KeyIntent::FocusPrevious), Some(idx));
            }
        }
    }
}
