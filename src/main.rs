//! CLI entry point for theme-selector.

mod cli;

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use theme_selector::build_info::cli_version_text;
use theme_selector::config::{initialize_default_config, load_config_with_source, ConfigInitResult};
use theme_selector::error::SelectorError;
use theme_selector::system::detect_prefers_dark;
use theme_selector::ui::render;
use theme_selector::ui::{UiEvent, UiTarget};
use theme_selector::{SelectorDeps, ThemeSelector};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "THEME_SELECTOR_LOG";
const EVENT_POLL_MS: u64 = 100;
const PREFERENCE_POLL_SECS: u64 = 2;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    if args.version {
        println!("{}", cli_version_text());
        return;
    }
    let color = !args.no_color && io::stderr().is_terminal();
    init_tracing(color);

    if let Some(cli::Command::Init { force }) = args.command {
        match initialize_default_config(args.config.as_deref(), force) {
            Ok(result) => report_init(&result),
            Err(e) => fail(&e),
        }
        return;
    }

    let loaded = match load_config_with_source(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => fail(&e),
    };
    debug!(source = ?loaded.source, "configuration loaded");
    let deps = SelectorDeps::from_config(&loaded.config);
    let mut selector = match ThemeSelector::new(loaded.config, deps) {
        Ok(selector) => selector,
        Err(e) => fail(&e),
    };

    let command = args.command.unwrap_or(cli::Command::Pick);
    let result = run_command(&mut selector, command, color).await;
    selector.settle().await;
    selector.destroy();
    if let Err(e) = result {
        fail(&e);
    }
}

fn init_tracing(color: bool) {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(color)
        .with_writer(io::stderr)
        .try_init();
}

fn fail(e: &SelectorError) -> ! {
    eprintln!("error: {e} [{}]", e.code());
    std::process::exit(1);
}

fn report_init(result: &ConfigInitResult) {
    match result {
        ConfigInitResult::Created { path } => {
            println!("wrote config template to {}", path.display());
        }
        ConfigInitResult::AlreadyInitialized { path } => {
            println!(
                "config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        ConfigInitResult::Overwritten { path, backup_path } => {
            println!(
                "overwrote {} (previous config saved to {})",
                path.display(),
                backup_path.display()
            );
        }
    }
}

async fn run_command(
    selector: &mut ThemeSelector,
    command: cli::Command,
    color: bool,
) -> Result<(), SelectorError> {
    selector.initialize().await?;
    match command {
        cli::Command::List => {
            print_theme_list(selector);
            Ok(())
        }
        cli::Command::Current { css } => {
            let current = selector.current_theme().unwrap_or_default();
            match selector.catalog().get(current) {
                Some(theme) => println!("{} {} ({current})", theme.icon, theme.name),
                None => println!("{current}"),
            }
            if css {
                print!("{}", selector.presentation().to_css());
            }
            Ok(())
        }
        cli::Command::Apply { key } => {
            finish_transition(selector).await;
            selector.select_theme(&key)?;
            print_notice(selector);
            Ok(())
        }
        cli::Command::Reset => {
            finish_transition(selector).await;
            selector.reset()?;
            print_notice(selector);
            Ok(())
        }
        cli::Command::Pick => {
            if io::stdin().is_terminal() && io::stderr().is_terminal() {
                run_picker(selector, color).await
            } else {
                finish_transition(selector).await;
                pick_fallback(selector)
            }
        }
        cli::Command::Init { .. } => Ok(()),
    }
}

fn print_theme_list(selector: &ThemeSelector) {
    let current = selector.current_theme();
    for theme in selector.catalog().iter() {
        let marker = if current == Some(theme.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<10} {} {} - {}",
            theme.id, theme.icon, theme.name, theme.description
        );
    }
}

fn print_notice(selector: &ThemeSelector) {
    if let Some(notice) = selector.notice() {
        println!("{}", notice.message);
    }
}

/// Wait out the transition started by the previous apply.
async fn finish_transition(selector: &mut ThemeSelector) {
    while selector.is_transitioning() {
        let Some(deadline) = selector.next_deadline() else {
            break;
        };
        sleep_until(deadline).await;
        selector.tick(Instant::now());
    }
}

/// Numbered prompt used when stdin/stderr are not terminals.
fn pick_fallback(selector: &mut ThemeSelector) -> Result<(), SelectorError> {
    let keys: Vec<String> = selector.catalog().keys().map(str::to_string).collect();
    eprintln!("• Select a theme");
    for (idx, theme) in selector.catalog().iter().enumerate() {
        eprintln!("  {}. {} {}", idx + 1, theme.icon, theme.name);
    }
    eprint!("  pick (empty to cancel): ");
    let _ = io::stderr().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
        eprintln!();
        return Ok(());
    }
    let Ok(index) = line.trim().parse::<usize>() else {
        return Ok(());
    };
    let Some(key) = index.checked_sub(1).and_then(|idx| keys.get(idx)) else {
        return Ok(());
    };
    selector.select_theme(key)?;
    print_notice(selector);
    Ok(())
}

/// Raw mode lifetime guard so terminal state is restored on any return path.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn is_quit(key: &KeyEvent, open: bool) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') if key.modifiers.is_empty() => true,
        KeyCode::Esc => !open,
        _ => false,
    }
}

/// Forward terminal input to the selector until the receiver goes away.
fn spawn_terminal_reader(tx: mpsc::Sender<UiEvent>) {
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(EVENT_POLL_MS)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            let ui_event = match event::read() {
                Ok(Event::Key(key))
                    if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat =>
                {
                    UiEvent::Key(key)
                }
                Ok(Event::Resize(cols, rows)) => UiEvent::Resize { cols, rows },
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.blocking_send(ui_event).is_err() {
                break;
            }
        }
    });
}

/// Poll the OS color scheme and report changes.
fn spawn_preference_watcher(tx: mpsc::Sender<UiEvent>, mut prefers_dark: bool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PREFERENCE_POLL_SECS));
        loop {
            interval.tick().await;
            let Ok(now_dark) = tokio::task::spawn_blocking(detect_prefers_dark).await else {
                break;
            };
            if now_dark == prefers_dark {
                continue;
            }
            prefers_dark = now_dark;
            let change = UiEvent::SystemPreferenceChanged { prefers_dark };
            if tx.send(change).await.is_err() {
                break;
            }
        }
    });
}

/// Interactive widget: arrows move, Enter/Space select, Esc closes,
/// `q` or Ctrl-C quits.
async fn run_picker(selector: &mut ThemeSelector, color: bool) -> Result<(), SelectorError> {
    let ui_error = |e: io::Error| SelectorError::Ui {
        element: "terminal".to_string(),
        reason: e.to_string(),
    };
    let _guard = RawModeGuard::acquire().map_err(ui_error)?;
    let (tx, mut rx) = mpsc::channel::<UiEvent>(64);
    spawn_terminal_reader(tx.clone());
    spawn_preference_watcher(tx, selector.prefers_dark());

    finish_transition(selector).await;
    selector.open();

    let mut stderr = io::stderr();
    let mut previous_rows = 0usize;
    loop {
        if let Some(widget) = selector.widget() {
            previous_rows = render::draw(&mut stderr, widget, selector.notice(), color, previous_rows)
                .map_err(ui_error)?;
        }

        let deadline = selector.next_deadline();
        tokio::select! {
            received = rx.recv() => {
                let Some(ui_event) = received else { break };
                if let UiEvent::Key(key) = &ui_event {
                    if is_quit(key, selector.is_open()) {
                        break;
                    }
                    // The toggle row doubles as the pointer target for `t`.
                    if key.code == KeyCode::Char('t') && key.modifiers.is_empty() {
                        dispatch_logged(selector, UiEvent::PointerDown(UiTarget::Toggle));
                        continue;
                    }
                }
                dispatch_logged(selector, ui_event);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                selector.tick(Instant::now());
            }
        }
    }

    render::clear_rows(&mut stderr, previous_rows).map_err(ui_error)?;
    Ok(())
}

fn dispatch_logged(selector: &mut ThemeSelector, ui_event: UiEvent) {
    if let Err(e) = selector.dispatch(ui_event) {
        warn!(error = %e, "theme selector event failed");
    }
}
