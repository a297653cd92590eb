//! Atomic install protocol
//!
//! 1. Stage: create a private staging directory beside the slots.
//! 2. Populate: the caller places the payload archive and the executable in
//!    staging, populate adds icon, manifest and record.
//! 3. Displace: move the old slot aside, rename staging onto the slot, delete
//!    the old slot.
//! 4. Migrate: carry user data over when the store key changed.
//!
//! Anything failing before Displace leaves the store as it was; the staging
//! directory is removed by its drop guard. Failures from Displace on are
//! reported as `PromotionFailed`.

use std::fs;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::descriptor::{Descriptor, StoreKey, archive};
use crate::error::{Result, file_read_failed, promotion_failed, transform_failed};
use crate::progress::{PipelineStage, ProgressReporter};

use super::staging::RETIRED_PREFIX;
use super::{
    EXECUTABLE_FILE, ICON_FILE, MANIFEST_FILE, RECORD_FILE, RESOURCE_FILE, StagingArea, Store,
    StoreRecord,
};

/// Writes installs into a [`Store`]
#[derive(Debug)]
pub struct StoreWriter<'a> {
    store: &'a Store,
    cancel: CancellationToken,
}

impl<'a> StoreWriter<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Create the staging directory for one install
    pub fn stage(&self) -> Result<StagingArea> {
        StagingArea::create(&self.store.apps_dir())
    }

    /// Fill `staging` around the payload archive and the executable already
    /// in it.
    ///
    /// Extracts the icon (a failure there is logged and skipped), writes the
    /// merged manifest and the record. Returns the record that will become
    /// visible on promotion.
    pub fn populate(
        &self,
        staging: &StagingArea,
        descriptor: &Descriptor,
        payload_digest: String,
    ) -> Result<StoreRecord> {
        let resources = staging.join(RESOURCE_FILE);
        if !resources.is_file() {
            return Err(file_read_failed(
                resources.display().to_string(),
                "payload archive was not staged",
            ));
        }
        if !staging.join(EXECUTABLE_FILE).is_file() {
            return Err(transform_failed(format!(
                "no {EXECUTABLE_FILE} was produced"
            )));
        }

        let icon = descriptor
            .icon()
            .and_then(|entry| extract_icon(&resources, entry, &staging.join(ICON_FILE)));

        descriptor.write_to(&staging.join(MANIFEST_FILE))?;

        let record = StoreRecord::for_descriptor(descriptor, icon, payload_digest);
        record.save(&staging.join(RECORD_FILE))?;
        Ok(record)
    }

    /// Make a populated staging directory the permanent slot for `record`.
    ///
    /// When `previous` lives under another key its user data is moved to the
    /// new key and its slot is removed.
    pub fn promote(
        &self,
        mut staging: StagingArea,
        record: &StoreRecord,
        previous: Option<&StoreRecord>,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        self.cancel.check()?;

        progress.stage(PipelineStage::Promote);
        let slot = self.store.app_dir(&record.key);
        self.displace(&mut staging, &slot)?;
        tracing::info!(key = %record.key, version = %record.version, "promoted install");

        if let Some(previous) = previous.filter(|p| p.key != record.key) {
            progress.stage(PipelineStage::Migrate);
            self.migrate(&previous.key, &record.key)?;
        }
        Ok(())
    }

    fn displace(&self, staging: &mut StagingArea, slot: &Path) -> Result<()> {
        let retired = if slot.exists() {
            let retired = self
                .store
                .apps_dir()
                .join(format!("{RETIRED_PREFIX}{}", staging.suffix()));
            fs::rename(slot, &retired).map_err(|e| {
                promotion_failed(
                    slot.display().to_string(),
                    format!("cannot move previous install aside: {e}"),
                )
            })?;
            Some(retired)
        } else {
            None
        };

        if let Err(e) = staging.promote_to(slot) {
            if let Some(retired) = &retired {
                if let Err(restore) = fs::rename(retired, slot) {
                    tracing::error!(
                        slot = %slot.display(),
                        retired = %retired.display(),
                        "failed to restore previous install: {restore}"
                    );
                }
            }
            return Err(promotion_failed(
                slot.display().to_string(),
                format!("cannot rename staging directory: {e}"),
            ));
        }

        if let Some(retired) = retired {
            if let Err(e) = fs::remove_dir_all(&retired) {
                tracing::warn!(path = %retired.display(), "failed to remove retired install: {e}");
            }
        }
        Ok(())
    }

    fn migrate(&self, from: &StoreKey, to: &StoreKey) -> Result<()> {
        tracing::info!(from = %from, to = %to, "migrating user data");
        relocate(&self.store.data_dir(from), &self.store.data_dir(to))?;
        relocate(&self.store.config_dir(from), &self.store.config_dir(to))?;

        let old_slot = self.store.app_dir(from);
        if old_slot.exists() {
            fs::remove_dir_all(&old_slot).map_err(|e| {
                promotion_failed(
                    old_slot.display().to_string(),
                    format!("cannot remove previous install: {e}"),
                )
            })?;
        }
        Ok(())
    }
}

fn extract_icon(resources: &Path, entry: &str, dest: &Path) -> Option<String> {
    match archive::extract_entry(resources, entry, dest) {
        Ok(()) => Some(ICON_FILE.to_string()),
        Err(e) => {
            tracing::warn!(icon = entry, "installing without icon: {e}");
            let _ = fs::remove_file(dest);
            None
        }
    }
}

/// Move `from` to `to`. An existing `to` wins and `from` is deleted.
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Ok(());
    }
    let result = if to.exists() {
        tracing::debug!(path = %from.display(), "destination exists, dropping old directory");
        fs::remove_dir_all(from)
    } else {
        fs::rename(from, to)
    };
    result.map_err(|e| promotion_failed(to.display().to_string(), e.to_string()))
}
