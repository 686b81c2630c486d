//! Selector notifications.
//!
//! Every notification is wrapped in an [`EventEnvelope`] carrying a wall-clock
//! timestamp and the crate version, then fanned out to subscribers over
//! unbounded tokio channels. Subscribers that dropped their receiver are
//! pruned on the next emit.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::build_info;
use crate::config::ThemeDefinition;

/// Typed selector notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum SelectorEvent {
    Initialized {
        theme: String,
    },
    ThemeChanged {
        old: Option<String>,
        new: String,
        /// Key whose definition was applied (`system` resolves to light/dark).
        actual: String,
        definition: ThemeDefinition,
    },
    Opened,
    Closed,
    Destroyed,
}

impl SelectorEvent {
    /// Namespaced event name, e.g. `themeSelector:themeChanged`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "themeSelector:initialized",
            Self::ThemeChanged { .. } => "themeSelector:themeChanged",
            Self::Opened => "themeSelector:opened",
            Self::Closed => "themeSelector:closed",
            Self::Destroyed => "themeSelector:destroyed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    pub timestamp_ms: u64,
    pub version: String,
    pub event: SelectorEvent,
}

impl EventEnvelope {
    pub fn new(event: SelectorEvent) -> Self {
        Self {
            timestamp_ms: now_unix_millis(),
            version: build_info::VERSION.to_string(),
            event,
        }
    }

    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}

/// Fan-out of envelopes to subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    observers: Vec<mpsc::UnboundedSender<EventEnvelope>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EventEnvelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: SelectorEvent) {
        let envelope = EventEnvelope::new(event);
        debug!(event = envelope.name(), "dispatching selector event");
        self.observers
            .retain(|observer| observer.send(envelope.clone()).is_ok());
    }

    /// Drop every subscriber; their receivers observe a closed channel.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
