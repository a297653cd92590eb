//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - inspect: Inspect command arguments
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - list: List command arguments
//! - show: Show command arguments
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod inspect;
pub mod install;
pub mod list;
pub mod show;
pub mod uninstall;

pub use cache::{CacheArgs, CacheSubcommand};
pub use completions::CompletionsArgs;
pub use inspect::InspectArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use show::ShowArgs;
pub use uninstall::UninstallArgs;

/// appstow - application package installer
///
/// Install descriptor + archive application packages into an atomic store.
#[derive(Parser, Debug)]
#[command(
    name = "appstow",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installer for descriptor + archive application packages",
    long_about = "appstow inspects application packages (a .jad descriptor with its .jar archive, \
                  or a bare .jar), converts their bytecode with an external transformer and installs \
                  them atomically into an application store, keeping user data across upgrades.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  appstow inspect ./Snake.jad            \x1b[90m# Classify against the store\x1b[0m\n   \
                  appstow install ./Snake.jad            \x1b[90m# Install or upgrade\x1b[0m\n   \
                  appstow install ./Snake.jar -y         \x1b[90m# Install without prompting\x1b[0m\n   \
                  appstow list                           \x1b[90m# List installed applications\x1b[0m\n   \
                  appstow uninstall Snake_<hash>         \x1b[90m# Remove an application\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Application store root (defaults to the configured or platform data directory)
    #[arg(long, short = 's', global = true, env = "APPSTOW_HOME")]
    pub store: Option<PathBuf>,

    /// Settings file (defaults to $APPSTOW_CONFIG or the platform config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a package against the store without installing it
    Inspect(InspectArgs),

    /// Install a package
    Install(InstallArgs),

    /// Remove an installed application with its data
    Uninstall(UninstallArgs),

    /// List installed applications
    List(ListArgs),

    /// Show an installed application
    Show(ShowArgs),

    /// Manage the payload cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
