//! Install command implementation
//!
//! Inspects the package, asks before replacing an installed version and
//! commits it.

use console::Style;

use crate::cli::InstallArgs;
use crate::error::{Result, app_not_found};
use crate::progress::{ProgressReporter, TerminalProgress};
use crate::resolver::InstallOutcome;

use super::helpers::{GlobalOptions, build_pipeline, confirm, open_store, parse_key};
use super::inspect::print_context;

pub fn run(global: &GlobalOptions, args: InstallArgs) -> Result<()> {
    let settings = global.settings()?;
    let store = open_store(&settings)?;
    let pipeline = build_pipeline(&settings, store)?;

    let mut ctx = pipeline.inspect(&args.source)?;
    if let Some(raw) = &args.replaces {
        let key = parse_key(raw)?;
        let previous = pipeline
            .store()
            .get(&key)?
            .ok_or_else(|| app_not_found(raw.as_str()))?;
        ctx = ctx.with_previous(previous);
    }
    print_context(&ctx);

    let outcome = ctx.outcome();
    if outcome.needs_confirmation() && !args.yes {
        let question = match outcome {
            InstallOutcome::Older => "A newer version is installed. Downgrade?",
            InstallOutcome::Equal => "This version is already installed. Reinstall?",
            _ => "Upgrade the installed version?",
        };
        if !confirm(question, outcome == InstallOutcome::Newer)? {
            println!("Install cancelled.");
            return Ok(());
        }
    }

    let progress = TerminalProgress::new();
    let pipeline = pipeline.with_progress(progress.clone());
    let result = pipeline.commit(&ctx);
    progress.finish();

    let record = match result {
        Ok(record) => record,
        Err(e) => {
            if e.is_store_inconsistent() {
                eprintln!(
                    "{} the application store may be inconsistent; reinstall {}",
                    Style::new().yellow().bold().apply_to("Warning:"),
                    ctx.descriptor().name()
                );
            }
            return Err(e);
        }
    };

    println!(
        "{} {} {} as {}",
        Style::new().green().bold().apply_to("Installed"),
        record.name,
        record.version,
        record.key
    );
    Ok(())
}
