//! Remote preference service.
//!
//! The HTTP layer is split into:
//! - `wire`: JSON bodies exchanged with the preference endpoints
//! - `client`: the `reqwest` implementation and endpoint resolution

use crate::error::SelectorError;
use async_trait::async_trait;

mod client;
pub mod wire;

pub use client::HttpPreferenceService;

/// Remote store for the theme preference, keyed by the caller's session.
///
/// Tests provide deterministic mocks; production uses
/// [`HttpPreferenceService`].
#[async_trait]
pub trait PreferenceService: Send + Sync {
    /// Fetch the anti-forgery token required by `save_theme`.
    async fn fetch_csrf_token(&self) -> Result<String, SelectorError>;
    /// Load the stored preference. `Ok(None)` when the service has none.
    async fn load_theme(&self) -> Result<Option<String>, SelectorError>;
    /// Store `theme` as the session's preference.
    async fn save_theme(&self, theme: &str, csrf_token: &str) -> Result<(), SelectorError>;
}
