//! Shared test fixtures for storage, remote, and selector test modules.
//!
//! Keeping the temp-dir, HTTP stub, and mock service helpers here prevents
//! each test module from rebuilding ad-hoc versions.

use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::api::PreferenceService;
use crate::error::SelectorError;
use crate::storage::PreferenceStore;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("theme-selector-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Format a complete `Connection: close` HTTP/1.1 JSON response.
pub fn http_response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Serve one canned response per accepted connection, in order.
///
/// Returns the base URL and a handle resolving to the raw requests received.
pub async fn spawn_http_stub(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            requests.push(read_request(&mut stream).await);
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        requests
    });
    (format!("http://{addr}"), handle)
}

/// Read headers plus a `Content-Length` body.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let body_len = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + body_len {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Scriptable [`PreferenceService`] that records saves.
#[derive(Debug, Default)]
pub struct MockPreferenceService {
    token: Option<String>,
    stored: Mutex<Option<String>>,
    fail_load: bool,
    fail_save: bool,
    saves: Mutex<Vec<(String, String)>>,
    loads: AtomicU64,
}

impl MockPreferenceService {
    /// Service that issues `token` and has `stored` as the saved preference.
    pub fn new(token: Option<&str>, stored: Option<&str>) -> Self {
        Self {
            token: token.map(str::to_string),
            stored: Mutex::new(stored.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    /// `(theme, csrf_token)` pairs received by `save_theme`.
    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().expect("saves lock").clone()
    }

    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PreferenceService for MockPreferenceService {
    async fn fetch_csrf_token(&self) -> Result<String, SelectorError> {
        self.token
            .clone()
            .ok_or_else(|| SelectorError::remote("fetch CSRF token", Some(403), "Forbidden"))
    }

    async fn load_theme(&self) -> Result<Option<String>, SelectorError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if self.fail_load {
            return Err(SelectorError::remote("load theme", None, "connection refused"));
        }
        Ok(self.stored.lock().expect("stored lock").clone())
    }

    async fn save_theme(&self, theme: &str, csrf_token: &str) -> Result<(), SelectorError> {
        self.saves
            .lock()
            .expect("saves lock")
            .push((theme.to_string(), csrf_token.to_string()));
        if self.fail_save {
            return Err(SelectorError::remote("save theme", Some(500), "boom"));
        }
        *self.stored.lock().expect("stored lock") = Some(theme.to_string());
        Ok(())
    }
}

/// Store whose reads and/or writes always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore {
    pub fail_load: bool,
    pub fail_save: bool,
}

impl PreferenceStore for FailingStore {
    fn load(&self) -> io::Result<Option<String>> {
        if self.fail_load {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"));
        }
        Ok(None)
    }

    fn save(&mut self, _theme: &str) -> io::Result<()> {
        if self.fail_save {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "quota exceeded"));
        }
        Ok(())
    }
}

/// Store whose first `failures` loads fail, then behaves like `inner`.
pub struct FlakyStore {
    pub inner: crate::storage::MemoryStore,
    failures: AtomicU64,
}

impl FlakyStore {
    pub fn failing_loads(inner: crate::storage::MemoryStore, failures: u64) -> Self {
        Self {
            inner,
            failures: AtomicU64::new(failures),
        }
    }
}

impl PreferenceStore for FlakyStore {
    fn load(&self) -> io::Result<Option<String>> {
        let left = self.failures.load(Ordering::Relaxed);
        if left > 0 {
            self.failures.store(left - 1, Ordering::Relaxed);
            return Err(io::Error::new(io::ErrorKind::Interrupted, "transient"));
        }
        self.inner.load()
    }

    fn save(&mut self, theme: &str) -> io::Result<()> {
        self.inner.save(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().exists());
    }

    #[test]
    fn http_response_sets_content_length() {
        let raw = http_response(200, "{}");
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains("Content-Length: 2\r\n"));
        assert!(raw.ends_with("\r\n\r\n{}"));
    }
}
