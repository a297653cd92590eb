//! appstow - application package installer
//!
//! Command line front end for inspecting, installing and removing
//! descriptor + archive application packages.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use appstow::cli::{Cli, Commands};
use appstow::commands::{self, GlobalOptions};

/// Environment variable holding the log filter
const LOG_ENV: &str = "APPSTOW_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("appstow=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("appstow=warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let global = GlobalOptions {
        store: cli.store,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Inspect(args) => commands::inspect::run(&global, args),
        Commands::Install(args) => commands::install::run(&global, args),
        Commands::Uninstall(args) => commands::uninstall::run(&global, args),
        Commands::List(args) => commands::list::run(&global, args),
        Commands::Show(args) => commands::show::run(&global, args),
        Commands::Cache(args) => commands::cache::run(&global, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
