//! Startup preference resolution: remote, then local storage, then the
//! configured default.

use tracing::{info, warn};

use crate::catalog::ThemeCatalog;
use crate::error::SelectorError;
use crate::persistence::PersistenceSink;

/// Where the resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Remote,
    Local,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub key: String,
    pub source: ResolutionSource,
}

/// Pick the initial theme key.
///
/// Remote failures are logged and fall through. A successfully fetched
/// session token is cached on `sink` for later saves. Only a local storage
/// read failure is an error.
pub async fn resolve_initial_theme(
    catalog: &ThemeCatalog,
    default_theme: &str,
    sink: &mut PersistenceSink,
) -> Result<Resolution, SelectorError> {
    let fallback = || Resolution {
        key: default_theme.to_string(),
        source: ResolutionSource::Default,
    };
    if !sink.remembers() {
        return Ok(fallback());
    }

    if let Some(remote) = sink.remote().cloned() {
        match remote.fetch_csrf_token().await {
            Ok(token) => {
                sink.set_csrf_token(Some(token));
                info!("remote preference session established");
                match remote.load_theme().await {
                    Ok(Some(key)) if catalog.contains(&key) => {
                        return Ok(Resolution {
                            key,
                            source: ResolutionSource::Remote,
                        });
                    }
                    Ok(Some(key)) => warn!(theme = %key, "ignoring unknown theme from server"),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "failed to load theme from server"),
                }
            }
            Err(e) => warn!(error = %e, "failed to initialize remote persistence"),
        }
    }

    match sink.load_local()? {
        Some(key) if catalog.contains(&key) => Ok(Resolution {
            key,
            source: ResolutionSource::Local,
        }),
        _ => Ok(fallback()),
    }
}
