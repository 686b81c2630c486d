//! theme-selector: a theme catalog, resolver, guarded applier, persistence
//! sink, and disclosure-widget controller.
//!
//! The engine is host-agnostic. The presentation scope, preference storage,
//! and remote preference service are traits; the crate ships an in-memory
//! document root, a JSON file store, and a `reqwest` client.
//!
//! # Quick start
//!
//! ```no_run
//! use theme_selector::config::load_config;
//! use theme_selector::{SelectorDeps, ThemeSelector};
//!
//! # async fn example() -> Result<(), theme_selector::error::SelectorError> {
//! let config = load_config(None)?;
//! let deps = SelectorDeps::from_config(&config);
//! let mut selector = ThemeSelector::new(config, deps)?;
//! if let Some(resolution) = selector.initialize().await? {
//!     println!("active theme: {} ({:?})", resolution.key, resolution.source);
//! }
//! println!("{}", selector.presentation().to_css());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod applier;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod persistence;
pub mod presentation;
pub mod resolver;
pub mod selector;
pub mod storage;
pub mod system;
#[cfg(test)]
pub mod testsupport;
pub mod timers;
pub mod ui;

pub use selector::{SelectorDeps, ThemeSelector};
