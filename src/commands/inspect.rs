//! Inspect command implementation
//!
//! Classifies a package against the store and prints what an install would
//! do. Nothing is downloaded or written.

use std::path::Path;

use console::Style;

use crate::cli::InspectArgs;
use crate::error::Result;
use crate::pipeline::{InstallContext, InstallPipeline};
use crate::resolver::InstallOutcome;

use super::helpers::{GlobalOptions, open_store, styled_outcome};

pub fn run(global: &GlobalOptions, args: InspectArgs) -> Result<()> {
    let settings = global.settings()?;
    let store = open_store(&settings)?;
    // Inspect never transforms, so no transformer has to be configured
    let pipeline = InstallPipeline::new(store, skip_transform)?;
    let ctx = pipeline.inspect(&args.source)?;
    print_context(&ctx);
    Ok(())
}

fn skip_transform(_input: &Path, _output: &Path) -> Result<()> {
    Ok(())
}

/// Print the inspection summary of a package
pub fn print_context(ctx: &InstallContext) {
    let bold = Style::new().bold();
    let descriptor = ctx.descriptor();

    println!(
        "{} {}",
        Style::new().bold().yellow().apply_to(descriptor.name()),
        descriptor.version()
    );
    println!("  {} {}", bold.apply_to("Vendor:"), descriptor.vendor());
    println!("  {} {}", bold.apply_to("Key:"), ctx.key());
    println!("  {} {}", bold.apply_to("Archive:"), ctx.archive());
    if let Some(previous) = ctx.previous() {
        println!(
            "  {} {} ({})",
            bold.apply_to("Installed:"),
            previous.version,
            previous.key
        );
    }
    println!("  {} {}", bold.apply_to("Outcome:"), styled_outcome(ctx.outcome()));

    if ctx.outcome() == InstallOutcome::Unmatched {
        if let Some(manifest) = ctx.manifest() {
            println!(
                "  {} archive manifest describes {manifest}",
                Style::new().red().bold().apply_to("Mismatch:")
            );
        }
    }
}
