//! List command implementation
//!
//! This command lists all installed applications with their versions and
//! store keys.

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::store::{Store, StoreRecord};

use super::helpers::{GlobalOptions, open_store};

/// Run list command
pub fn run(global: &GlobalOptions, args: ListArgs) -> Result<()> {
    let settings = global.settings()?;
    let store = open_store(&settings)?;
    list_records(&store, args.detailed)
}

fn list_records(store: &Store, detailed: bool) -> Result<()> {
    let records = store.records()?;

    if records.is_empty() {
        println!("No applications installed.");
        return Ok(());
    }

    println!("Installed applications ({}):", records.len());
    println!();

    for record in &records {
        display_record(store, record, detailed);
        println!();
    }

    Ok(())
}

fn display_record(store: &Store, record: &StoreRecord, detailed: bool) {
    let bold = Style::new().bold();
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&record.name),
        record.version
    );
    println!("    {} {}", bold.apply_to("Vendor:"), record.vendor);
    println!("    {} {}", bold.apply_to("Key:"), record.key);
    if detailed {
        let paths = store.paths(&record.key);
        println!("    {} {}", bold.apply_to("Executable:"), paths.executable.display());
        println!("    {} {}", bold.apply_to("Data:"), paths.data_dir.display());
        if !record.payload_digest.is_empty() {
            println!("    {} {}", bold.apply_to("Digest:"), record.payload_digest);
        }
    }
}
