//! Uninstall command implementation

use console::Style;

use crate::cli::UninstallArgs;
use crate::error::Result;

use super::helpers::{GlobalOptions, confirm, open_store, require_record};

pub fn run(global: &GlobalOptions, args: UninstallArgs) -> Result<()> {
    let settings = global.settings()?;
    let store = open_store(&settings)?;
    let record = require_record(&store, &args.key)?;

    if !args.yes {
        println!(
            "\n{} {} will be removed together with its data and configuration.\n",
            record.name, record.version
        );
        if !confirm("Proceed with uninstall?", true)? {
            println!("Uninstall cancelled.");
            return Ok(());
        }
    }

    let removed = store.uninstall(&record.key)?;
    println!(
        "{} {} {}",
        Style::new().green().bold().apply_to("Uninstalled"),
        removed.name,
        removed.version
    );
    Ok(())
}
