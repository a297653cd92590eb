use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install from a descriptor:\n    appstow install ./Snake.jad\n\n\
                   Install an archive directly:\n    appstow install ./Snake.jar\n\n\
                   Reinstall or downgrade without prompting:\n    appstow install ./Snake.jad -y\n\n\
                   Upgrade an application whose vendor changed:\n    appstow install ./Snake.jad --replaces Snake_1a2b3c4d5e6f7a8b")]
pub struct InstallArgs {
    /// Package descriptor (.jad) or archive (.jar)
    pub source: PathBuf,

    /// Skip confirmation prompt for upgrades, reinstalls and downgrades
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Store key of an installed application this package replaces; its user
    /// data is moved to the new key
    #[arg(long, value_name = "KEY")]
    pub replaces: Option<String>,
}
