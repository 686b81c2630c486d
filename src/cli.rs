//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use theme_selector::build_info;

/// Pick, apply, and persist a visual theme.
#[derive(Debug, Parser)]
#[command(
    name = "theme-selector",
    disable_version_flag = true,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Print version and build metadata.
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Path to config file (default: ./theme-selector.toml or
    /// ~/.config/theme-selector/config.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// List available themes, marking the active one.
    List,
    /// Print the active theme and the resulting style scope.
    Current {
        /// Print the root scope as CSS.
        #[arg(long)]
        css: bool,
    },
    /// Apply and persist a theme.
    Apply {
        /// Theme key, e.g. `dark`.
        key: String,
    },
    /// Apply and persist the configured default theme.
    Reset,
    /// Open the interactive picker (the default command).
    Pick,
    /// Write a commented config template.
    Init {
        /// Overwrite an existing config (a `.bak` copy is kept).
        #[arg(long)]
        force: bool,
    },
}
