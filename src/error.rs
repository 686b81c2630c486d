//! Unified error type for the theme selector.
//!
//! Every failure is one `SelectorError` variant; callers that only need to
//! branch on the category use [`SelectorError::kind`].

use std::fmt;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Transition,
    Persistence,
    Configuration,
    Ui,
    EventBinding,
    RemoteCall,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "THEME_NOT_FOUND",
            Self::Transition => "THEME_TRANSITION_ERROR",
            Self::Persistence => "THEME_PERSISTENCE_ERROR",
            Self::Configuration => "THEME_CONFIGURATION_ERROR",
            Self::Ui => "THEME_UI_ERROR",
            Self::EventBinding => "THEME_EVENT_ERROR",
            Self::RemoteCall => "THEME_REMOTE_ERROR",
        }
    }
}

// ---------------------------------------------------------------------------
// SelectorError
// ---------------------------------------------------------------------------

/// Errors surfaced by selector operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// A theme key that is not in the catalog.
    NotFound { key: String },
    /// `apply_theme` while a previous transition is still in flight.
    AlreadyInTransition,
    /// Local storage read/write failure.
    Persistence {
        operation: &'static str,
        reason: String,
    },
    /// Invalid configuration or catalog mutation.
    Configuration(String),
    /// A widget part could not be built.
    Ui { element: String, reason: String },
    /// A required event binding could not be attached.
    EventBinding { event: String, reason: String },
    /// Non-2xx, transport-level, or malformed response from a remote endpoint.
    RemoteCall {
        operation: &'static str,
        status: Option<u16>,
        reason: String,
    },
}

impl SelectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyInTransition => ErrorKind::Transition,
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Ui { .. } => ErrorKind::Ui,
            Self::EventBinding { .. } => ErrorKind::EventBinding,
            Self::RemoteCall { .. } => ErrorKind::RemoteCall,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn persistence(operation: &'static str, reason: impl fmt::Display) -> Self {
        Self::Persistence {
            operation,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn remote(
        operation: &'static str,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RemoteCall {
            operation,
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status for remote failures, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteCall { status, .. } => *status,
            _ => None,
        }
    }
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { key } => write!(f, "theme \"{key}\" not found"),
            Self::AlreadyInTransition => {
                write!(f, "theme transition failed: transition already in progress")
            }
            Self::Persistence { operation, reason } => {
                write!(f, "failed to {operation} theme preference: {reason}")
            }
            Self::Configuration(msg) => write!(f, "invalid theme configuration: {msg}"),
            Self::Ui { element, reason } => {
                write!(f, "failed to create UI element \"{element}\": {reason}")
            }
            Self::EventBinding { event, reason } => {
                write!(f, "failed to bind event \"{event}\": {reason}")
            }
            Self::RemoteCall {
                operation,
                status: Some(code),
                reason,
            } => write!(f, "remote {operation} failed with status {code}: {reason}"),
            Self::RemoteCall {
                operation,
                status: None,
                reason,
            } => write!(f, "remote {operation} failed: {reason}"),
        }
    }
}

impl std::error::Error for SelectorError {}

impl From<toml::de::Error> for SelectorError {
    fn from(e: toml::de::Error) -> Self {
        Self::Configuration(format!("toml: {e}"))
    }
}
