//! `reqwest` implementation of [`PreferenceService`].
//!
//! Credentials are carried by the client's cookie jar, so the session cookie
//! set while fetching the CSRF token is replayed on load and save.

mod transport;

use super::wire::{failure_message, CsrfTokenResponse, LoadThemeResponse, SaveThemeResponse};
use super::PreferenceService;
use crate::config::RemoteConfig;
use crate::error::SelectorError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use transport::{
    read_json, transport_error, Endpoints, CSRF_HEADER, REQUESTED_WITH_HEADER,
    REQUESTED_WITH_VALUE,
};

/// HTTP client for the preference endpoints.
pub struct HttpPreferenceService {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpPreferenceService {
    /// Build a client from the `[remote]` config.
    ///
    /// Fails with a configuration error when an endpoint cannot be turned
    /// into an absolute URL.
    pub fn new(remote: &RemoteConfig) -> Result<Self, SelectorError> {
        let endpoints = Endpoints::resolve(remote)?;
        let http = transport::build_http_client(Duration::from_secs(remote.timeout_secs));
        Ok(Self { http, endpoints })
    }
}

#[async_trait]
impl PreferenceService for HttpPreferenceService {
    async fn fetch_csrf_token(&self) -> Result<String, SelectorError> {
        const OP: &str = "fetch CSRF token";
        let response = self
            .http
            .get(self.endpoints.csrf_token.clone())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(|e| transport_error(OP, e))?;
        let body: CsrfTokenResponse = read_json(OP, response).await?;
        if body.csrf_token.trim().is_empty() {
            return Err(SelectorError::remote(OP, None, "empty token"));
        }
        debug!("csrf token fetched");
        Ok(body.csrf_token)
    }

    async fn load_theme(&self) -> Result<Option<String>, SelectorError> {
        const OP: &str = "load theme";
        let response = self
            .http
            .get(self.endpoints.load_theme.clone())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(|e| transport_error(OP, e))?;
        let body: LoadThemeResponse = read_json(OP, response).await?;
        if !body.success {
            return Err(SelectorError::remote(
                OP,
                Some(500),
                failure_message(body.message),
            ));
        }
        Ok(body.theme.filter(|theme| !theme.trim().is_empty()))
    }

    async fn save_theme(&self, theme: &str, csrf_token: &str) -> Result<(), SelectorError> {
        const OP: &str = "save theme";
        let response = self
            .http
            .post(self.endpoints.save_theme.clone())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .header(CSRF_HEADER, csrf_token)
            .form(&[("theme", theme)])
            .send()
            .await
            .map_err(|e| transport_error(OP, e))?;
        let body: SaveThemeResponse = read_json(OP, response).await?;
        if !body.success {
            return Err(SelectorError::remote(
                OP,
                Some(500),
                failure_message(body.message),
            ));
        }
        info!(theme, "theme preference saved remotely");
        Ok(())
    }
}
