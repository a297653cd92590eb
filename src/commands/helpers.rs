//! Command helper utilities

use std::path::PathBuf;

use console::Style;
use inquire::Confirm;

use crate::config::Settings;
use crate::descriptor::StoreKey;
use crate::error::{AppstowError, Result, app_not_found};
use crate::fetch::Fetcher;
use crate::pipeline::InstallPipeline;
use crate::resolver::InstallOutcome;
use crate::store::{Store, StoreRecord};

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Settings with the `--store` flag applied
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(store) = &self.store {
            settings.store_root = Some(store.clone());
        }
        Ok(settings)
    }
}

/// Open the store named by `settings`
pub fn open_store(settings: &Settings) -> Result<Store> {
    let root = settings.store_root()?;
    tracing::debug!(root = %root.display(), "opening store");
    Store::open(root)
}

/// Build an install pipeline from settings
pub fn build_pipeline(settings: &Settings, store: Store) -> Result<InstallPipeline> {
    let transformer = settings.transformer()?;
    let fetcher = Fetcher::new(settings.fetch_options())?;
    let payload_dir = crate::cache::payloads_dir(&settings.cache_root()?);
    Ok(InstallPipeline::new(store, transformer)?
        .with_fetcher(fetcher)
        .with_payload_dir(payload_dir))
}

/// Parse a store key typed by the user
pub fn parse_key(raw: &str) -> Result<StoreKey> {
    StoreKey::from_raw(raw).ok_or_else(|| app_not_found(raw))
}

/// Installed record under `raw`, or `AppNotFound`
pub fn require_record(store: &Store, raw: &str) -> Result<StoreRecord> {
    let key = parse_key(raw)?;
    store.get(&key)?.ok_or_else(|| app_not_found(raw))
}

/// Ask a yes/no question
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Confirm::new(message)
        .with_default(default)
        .with_help_message("Press Enter to accept the default, 'y' or 'n' to choose")
        .prompt()
        .map_err(|e| AppstowError::IoError {
            message: format!("Failed to read confirmation: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Outcome label colored by severity
pub fn styled_outcome(outcome: InstallOutcome) -> String {
    let style = match outcome {
        InstallOutcome::New | InstallOutcome::Newer => Style::new().green().bold(),
        InstallOutcome::Equal => Style::new().cyan().bold(),
        InstallOutcome::Older => Style::new().yellow().bold(),
        InstallOutcome::Unmatched => Style::new().red().bold(),
    };
    style.apply_to(outcome.to_string()).to_string()
}
