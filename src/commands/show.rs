//! Show command implementation

use console::Style;

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::store::{ICON_FILE, Store, StoreRecord};

use super::helpers::{GlobalOptions, open_store, require_record};

pub fn run(global: &GlobalOptions, args: ShowArgs) -> Result<()> {
    let settings = global.settings()?;
    let store = open_store(&settings)?;
    let record = require_record(&store, &args.key)?;
    show_record(&store, &record);
    Ok(())
}

fn show_record(store: &Store, record: &StoreRecord) {
    let bold = Style::new().bold();
    let paths = store.paths(&record.key);

    println!(
        "{} {}",
        Style::new().bold().yellow().apply_to(&record.name),
        record.version
    );
    println!("  {} {}", bold.apply_to("Vendor:"), record.vendor);
    println!("  {} {}", bold.apply_to("Key:"), record.key);
    if let Some(entry_point) = &record.entry_point {
        println!("  {} {}", bold.apply_to("Entry point:"), entry_point);
    }
    if record.icon.is_some() {
        println!(
            "  {} {}",
            bold.apply_to("Icon:"),
            paths.app_dir.join(ICON_FILE).display()
        );
    }
    println!("  {} {}", bold.apply_to("Executable:"), paths.executable.display());
    println!("  {} {}", bold.apply_to("Resources:"), paths.resources.display());
    println!("  {} {}", bold.apply_to("Manifest:"), paths.manifest.display());
    println!("  {} {}", bold.apply_to("Data:"), paths.data_dir.display());
    println!("  {} {}", bold.apply_to("Config:"), paths.config_dir.display());
    if !record.payload_digest.is_empty() {
        println!("  {} {}", bold.apply_to("Digest:"), record.payload_digest);
    }
    println!("  {} {}", bold.apply_to("Installed at:"), record.installed_at);
}
