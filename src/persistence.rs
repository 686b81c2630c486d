//! Preference persistence: synchronous local write plus a best-effort remote
//! save.
//!
//! Remote saves run as spawned tokio tasks. They never report failure to the
//! caller; errors are logged and dropped. Their completion order relative to
//! later saves is unspecified.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::PreferenceService;
use crate::error::SelectorError;
use crate::storage::PreferenceStore;

pub struct PersistenceSink {
    store: Box<dyn PreferenceStore>,
    /// `None` when remote persistence is disabled or unconfigured.
    remote: Option<Arc<dyn PreferenceService>>,
    remember: bool,
    csrf_token: Option<String>,
    pending: Vec<JoinHandle<()>>,
}

impl PersistenceSink {
    pub fn new(
        store: Box<dyn PreferenceStore>,
        remote: Option<Arc<dyn PreferenceService>>,
        remember: bool,
    ) -> Self {
        Self {
            store,
            remote,
            remember,
            csrf_token: None,
            pending: Vec::new(),
        }
    }

    pub fn remembers(&self) -> bool {
        self.remember
    }

    pub fn remote(&self) -> Option<&Arc<dyn PreferenceService>> {
        self.remote.as_ref()
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn set_csrf_token(&mut self, token: Option<String>) {
        self.csrf_token = token;
    }

    /// Stored local preference.
    pub fn load_local(&self) -> Result<Option<String>, SelectorError> {
        self.store
            .load()
            .map_err(|e| SelectorError::persistence("load", e))
    }

    /// Save `theme` locally, then queue a remote save when a session token is
    /// cached. No-op when preferences are not remembered.
    pub fn persist(&mut self, theme: &str) -> Result<(), SelectorError> {
        if !self.remember {
            return Ok(());
        }
        self.store
            .save(theme)
            .map_err(|e| SelectorError::persistence("save", e))?;
        debug!(theme, "theme preference saved locally");
        self.spawn_remote_save(theme);
        Ok(())
    }

    fn spawn_remote_save(&mut self, theme: &str) {
        let (Some(remote), Some(token)) = (self.remote.as_ref(), self.csrf_token.as_ref()) else {
            return;
        };
        let Ok(handle) = Handle::try_current() else {
            debug!(theme, "no async runtime; skipping remote theme save");
            return;
        };
        let remote = Arc::clone(remote);
        let token = token.clone();
        let theme = theme.to_string();
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(handle.spawn(async move {
            if let Err(e) = remote.save_theme(&theme, &token).await {
                warn!(theme = %theme, error = %e, "failed to save theme to server");
            }
        }));
    }

    /// Remote saves still running or not yet awaited.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait for every outstanding remote save.
    pub async fn settle(&mut self) {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                warn!(error = %e, "remote theme save task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::MemoryStore;
    use crate::testsupport::{FailingStore, MockPreferenceService};

    fn sink_with(
        store: impl PreferenceStore + 'static,
        remote: Option<Arc<MockPreferenceService>>,
        remember: bool,
    ) -> PersistenceSink {
        let remote = remote.map(|svc| svc as Arc<dyn PreferenceService>);
        PersistenceSink::new(Box::new(store), remote, remember)
    }

    #[test]
    fn persist_writes_local_store() {
        let store = MemoryStore::new();
        let mut sink = sink_with(store.clone(), None, true);
        sink.persist("sepia").expect("persist");
        assert_eq!(store.load().expect("load").as_deref(), Some("sepia"));
    }

    #[test]
    fn forgetful_sink_writes_nothing() {
        let store = MemoryStore::new();
        let mut sink = sink_with(store.clone(), None, false);
        sink.persist("sepia").expect("no-op");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn local_failures_are_persistence_errors() {
        let mut sink = sink_with(
            FailingStore {
                fail_load: true,
                fail_save: true,
            },
            None,
            true,
        );
        let save = sink.persist("dark").expect_err("save fails");
        assert_eq!(save.kind(), ErrorKind::Persistence);
        assert!(save.to_string().starts_with("failed to save theme preference"));
        let load = sink.load_local().expect_err("load fails");
        assert!(load.to_string().starts_with("failed to load theme preference"));
    }

    #[tokio::test]
    async fn remote_save_needs_a_cached_token() {
        let service = Arc::new(MockPreferenceService::new(Some("tok"), None));
        let mut sink = sink_with(MemoryStore::new(), Some(Arc::clone(&service)), true);

        sink.persist("dark").expect("persist");
        sink.settle().await;
        assert!(service.saves().is_empty());

        sink.set_csrf_token(Some("tok".to_string()));
        sink.persist("light").expect("persist");
        sink.settle().await;
        assert_eq!(service.saves(), vec![("light".to_string(), "tok".to_string())]);
        assert_eq!(sink.pending(), 0);
    }

    #[tokio::test]
    async fn remote_failure_does_not_fail_persist() {
        let service = Arc::new(MockPreferenceService::new(Some("tok"), None).failing_save());
        let store = MemoryStore::new();
        let mut sink = sink_with(store.clone(), Some(Arc::clone(&service)), true);
        sink.set_csrf_token(Some("tok".to_string()));

        sink.persist("blue").expect("local save still succeeds");
        sink.settle().await;
        assert_eq!(service.saves().len(), 1);
        assert_eq!(store.load().expect("load").as_deref(), Some("blue"));
    }

    #[test]
    fn remote_save_without_runtime_is_skipped() {
        let service = Arc::new(MockPreferenceService::new(Some("tok"), None));
        let mut sink = sink_with(MemoryStore::new(), Some(Arc::clone(&service)), true);
        sink.set_csrf_token(Some("tok".to_string()));
        sink.persist("green").expect("persist");
        assert_eq!(sink.pending(), 0);
        assert!(service.saves().is_empty());
    }
}
