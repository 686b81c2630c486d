//! JSON bodies of the preference endpoints.

use serde::{Deserialize, Serialize};

/// `GET <csrf_token>` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// `GET <load_theme>` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadThemeResponse {
    pub success: bool,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST <save_theme>` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveThemeResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reason reported when a `success = false` body carries no message.
pub(crate) fn failure_message(message: Option<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}
