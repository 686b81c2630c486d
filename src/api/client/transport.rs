//! HTTP transport helpers: client construction, endpoint URLs, JSON bodies.

use std::time::Duration;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;
use crate::error::SelectorError;

/// Header marking requests as same-origin script calls.
pub(super) const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub(super) const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
/// Anti-forgery header carried by saves.
pub(super) const CSRF_HEADER: &str = "X-CSRFToken";

/// Build an HTTP client with timeout and a session cookie jar.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .cookie_store(true)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Absolute URLs for the three endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Endpoints {
    pub(super) save_theme: Url,
    pub(super) load_theme: Url,
    pub(super) csrf_token: Url,
}

impl Endpoints {
    pub(super) fn resolve(remote: &RemoteConfig) -> Result<Self, SelectorError> {
        let base = remote
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| {
                    SelectorError::Configuration(format!("invalid remote base_url `{raw}`: {e}"))
                })
            })
            .transpose()?;
        Ok(Self {
            save_theme: endpoint_url(base.as_ref(), &remote.save_theme)?,
            load_theme: endpoint_url(base.as_ref(), &remote.load_theme)?,
            csrf_token: endpoint_url(base.as_ref(), &remote.csrf_token)?,
        })
    }
}

/// Absolute endpoints are used as-is; relative ones are joined onto `base`.
fn endpoint_url(base: Option<&Url>, endpoint: &str) -> Result<Url, SelectorError> {
    if let Ok(url) = Url::parse(endpoint) {
        return Ok(url);
    }
    let Some(base) = base else {
        return Err(SelectorError::Configuration(format!(
            "endpoint `{endpoint}` is relative but remote.base_url is not set"
        )));
    };
    base.join(endpoint).map_err(|e| {
        SelectorError::Configuration(format!("invalid endpoint `{endpoint}`: {e}"))
    })
}

/// Map transport failures (connect, timeout) to `RemoteCall` without status.
pub(super) fn transport_error(operation: &'static str, err: reqwest::Error) -> SelectorError {
    SelectorError::remote(operation, err.status().map(|s| s.as_u16()), err.to_string())
}

/// Check the status and decode a JSON body.
pub(super) async fn read_json<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, SelectorError> {
    let status = response.status();
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("unknown status");
        return Err(SelectorError::remote(
            operation,
            Some(status.as_u16()),
            reason,
        ));
    }
    response.json::<T>().await.map_err(|e| {
        SelectorError::remote(
            operation,
            Some(status.as_u16()),
            format!("malformed response: {e}"),
        )
    })
}
