//! Cache command implementation

use std::path::Path;

use crate::cache;
use crate::cli::{CacheArgs, CacheSubcommand};
use crate::error::Result;

use super::helpers::GlobalOptions;

pub fn run(global: &GlobalOptions, args: CacheArgs) -> Result<()> {
    let settings = global.settings()?;
    let cache_root = settings.cache_root()?;

    match args.command {
        Some(CacheSubcommand::Clear) => clean_all_cache(&cache_root),
        None => show_cache_stats(&cache_root),
    }
}

fn show_cache_stats(cache_root: &Path) -> Result<()> {
    let stats = cache::cache_stats(cache_root)?;

    println!("Cache Statistics:");
    println!("  Location: {}", cache_root.display());
    println!("  Payloads: {}", stats.files);
    println!("  Size: {}", stats.formatted_size());

    if stats.files == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'appstow cache clear' to remove everything from cache.");
    }

    Ok(())
}

fn clean_all_cache(cache_root: &Path) -> Result<()> {
    cache::clear_cache(cache_root)?;
    println!("Cache cleared successfully.");
    Ok(())
}
