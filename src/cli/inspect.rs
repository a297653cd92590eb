use clap::Parser;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Inspect a descriptor:\n    appstow inspect ./Snake.jad\n\n\
                  Inspect an archive:\n    appstow inspect ./Snake.jar")]
pub struct InspectArgs {
    /// Package descriptor (.jad) or archive (.jar)
    pub source: PathBuf,
}
