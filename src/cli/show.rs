use clap::Parser;

/// Arguments for the show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show an application:\n    appstow show Snake_1a2b3c4d5e6f7a8b")]
pub struct ShowArgs {
    /// Store key of the application (see 'appstow list')
    pub key: String,
}
