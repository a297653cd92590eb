use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show store paths and digests for each application
    #[arg(long)]
    pub detailed: bool,
}
