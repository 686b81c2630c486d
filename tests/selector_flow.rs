//! End-to-end selector flows through the public API: startup resolution,
//! selection, persistence across a restart, widget interaction, and teardown.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use theme_selector::config::{parse_overrides, resolve_config, SelectorConfig};
use theme_selector::error::ErrorKind;
use theme_selector::events::SelectorEvent;
use theme_selector::resolver::ResolutionSource;
use theme_selector::storage::{FileStore, MemoryStore, PreferenceStore};
use theme_selector::ui::{UiEvent, UiTarget};
use theme_selector::{SelectorDeps, ThemeSelector};
use tokio::time::Instant;

const TEMPLATE_TOML: &str = include_str!("../src/templates/theme-selector.toml");

/// Defaults with no transition window, so a `tick(now)` settles each apply.
fn instant_config() -> SelectorConfig {
    SelectorConfig {
        animation_duration: Duration::ZERO,
        ..SelectorConfig::default()
    }
}

fn key(code: KeyCode) -> UiEvent {
    UiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn temp_storage_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir()
        .join(format!("theme-selector-{tag}-{}-{nanos}", std::process::id()))
        .join("storage.json")
}

#[test]
fn bundled_template_resolves_to_builtin_defaults() {
    let overrides = parse_overrides(TEMPLATE_TOML).expect("template parses");
    let config = resolve_config(overrides).expect("template resolves");
    let defaults = SelectorConfig::default();
    assert_eq!(config.default_theme, defaults.default_theme);
    assert_eq!(config.animation_duration, defaults.animation_duration);
    assert_eq!(config.themes.len(), defaults.themes.len());
    assert!(config.remote.base_url.is_none());
}

#[tokio::test]
async fn first_run_follows_the_system_scheme() {
    let deps = SelectorDeps::new(MemoryStore::new()).with_prefers_dark(true);
    let mut selector = ThemeSelector::new(instant_config(), deps).expect("selector");

    let resolution = selector
        .initialize()
        .await
        .expect("initialize")
        .expect("first initialization");
    assert_eq!(resolution.key, "system");
    assert_eq!(resolution.source, ResolutionSource::Default);

    let root = selector.presentation();
    assert_eq!(root.classes().collect::<Vec<_>>(), vec!["theme-dark"]);
    assert_eq!(root.variables()["--theme-background"], "#0f172a");
    assert!(root.to_css().starts_with(":root.theme-dark {"));
    assert_eq!(selector.current_theme(), Some("system"));
}

#[tokio::test]
async fn selection_survives_a_restart() {
    let store = MemoryStore::new();

    let mut first =
        ThemeSelector::new(instant_config(), SelectorDeps::new(store.clone())).expect("selector");
    first.initialize().await.expect("initialize");
    first.tick(Instant::now());
    first.select_theme("sepia").expect("select");
    assert_eq!(
        first.notice().map(|n| n.message.as_str()),
        Some("Theme changed to Sepia")
    );
    first.destroy();
    assert_eq!(store.load().expect("load").as_deref(), Some("sepia"));

    let mut second =
        ThemeSelector::new(instant_config(), SelectorDeps::new(store)).expect("selector");
    let resolution = second
        .initialize()
        .await
        .expect("initialize")
        .expect("fresh selector");
    assert_eq!(resolution.key, "sepia");
    assert_eq!(resolution.source, ResolutionSource::Local);
    assert_eq!(
        second.presentation().variables()["--theme-primary"],
        "#f59e0b"
    );
}

#[tokio::test]
async fn file_store_round_trips_across_selectors() {
    let path = temp_storage_path("file-store");
    let mut first = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(FileStore::new(&path)),
    )
    .expect("selector");
    first.initialize().await.expect("initialize");
    first.tick(Instant::now());
    first.select_theme("contrast").expect("select");
    first.destroy();

    let text = fs::read_to_string(&path).expect("storage written");
    assert!(text.contains("\"contrast\""));

    let mut second = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(FileStore::new(&path)),
    )
    .expect("selector");
    let resolution = second.initialize().await.expect("initialize");
    assert_eq!(resolution.map(|r| r.key).as_deref(), Some("contrast"));

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[tokio::test]
async fn applying_during_a_transition_is_rejected() {
    let mut selector = ThemeSelector::new(
        SelectorConfig::default(),
        SelectorDeps::new(MemoryStore::new()),
    )
    .expect("selector");
    selector.initialize().await.expect("initialize");
    assert!(selector.is_transitioning());

    let err = selector.apply_theme("dark").expect_err("still transitioning");
    assert_eq!(err.kind(), ErrorKind::Transition);
    assert_eq!(selector.current_theme(), Some("system"));

    selector.tick(Instant::now() + Duration::from_secs(1));
    assert!(!selector.is_transitioning());
    selector.apply_theme("dark").expect("settled");
    assert_eq!(selector.previous_theme(), Some("system"));
}

#[tokio::test]
async fn keyboard_flow_opens_navigates_and_selects() {
    let mut selector = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(MemoryStore::new()),
    )
    .expect("selector");
    let mut events = selector.subscribe();
    selector.initialize().await.expect("initialize");
    selector.tick(Instant::now());

    let shortcut = UiEvent::Key(KeyEvent::new(
        KeyCode::Char('T'),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    ));
    selector.dispatch(shortcut).expect("toggle");
    assert!(selector.is_open());

    // Opening focuses the first option (system); two steps down is dark.
    selector.dispatch(key(KeyCode::Down)).expect("down");
    selector.dispatch(key(KeyCode::Down)).expect("down");
    selector.dispatch(key(KeyCode::Enter)).expect("select");

    assert_eq!(selector.current_theme(), Some("dark"));
    assert!(!selector.is_open());

    let mut names = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        names.push(envelope.name());
    }
    assert_eq!(
        names,
        vec![
            "themeSelector:themeChanged",
            "themeSelector:initialized",
            "themeSelector:opened",
            "themeSelector:themeChanged",
            "themeSelector:closed",
        ]
    );
}

#[tokio::test]
async fn pointer_reset_and_outside_click() {
    let mut selector = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(MemoryStore::with_value("blue")),
    )
    .expect("selector");
    selector.initialize().await.expect("initialize");
    selector.tick(Instant::now());
    assert_eq!(selector.current_theme(), Some("blue"));

    selector
        .dispatch(UiEvent::PointerDown(UiTarget::Toggle))
        .expect("open");
    assert!(selector.is_open());
    selector
        .dispatch(UiEvent::PointerDown(UiTarget::Outside))
        .expect("outside");
    assert!(!selector.is_open());

    selector
        .dispatch(UiEvent::PointerDown(UiTarget::Reset))
        .expect("reset");
    assert_eq!(selector.current_theme(), Some("system"));
    assert_eq!(selector.previous_theme(), Some("blue"));
}

#[tokio::test]
async fn system_preference_change_reapplies_system_theme() {
    let mut selector = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(MemoryStore::new()),
    )
    .expect("selector");
    selector.initialize().await.expect("initialize");
    selector.tick(Instant::now());
    assert_eq!(
        selector.presentation().classes().collect::<Vec<_>>(),
        vec!["theme-light"]
    );

    selector
        .dispatch(UiEvent::SystemPreferenceChanged { prefers_dark: true })
        .expect("preference change");
    assert!(selector.prefers_dark());
    assert_eq!(
        selector.presentation().classes().collect::<Vec<_>>(),
        vec!["theme-dark"]
    );
    assert_eq!(selector.current_theme(), Some("system"));
}

#[tokio::test]
async fn destroy_releases_handlers_and_notifies_once() {
    let mut selector = ThemeSelector::new(
        instant_config(),
        SelectorDeps::new(MemoryStore::new()),
    )
    .expect("selector");
    selector.initialize().await.expect("initialize");
    assert!(selector.bound_handlers() > 0);
    let mut events = selector.subscribe();

    selector.destroy();
    assert_eq!(selector.bound_handlers(), 0);
    assert!(selector.widget().is_none());
    assert!(!selector.is_initialized());

    let envelope = events.try_recv().expect("destroyed event");
    assert_eq!(envelope.event, SelectorEvent::Destroyed);
    assert!(events.try_recv().is_err());

    selector.destroy();
    assert_eq!(selector.tick(Instant::now() + Duration::from_secs(10)), 0);
}
