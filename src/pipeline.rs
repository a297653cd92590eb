//! Install pipeline
//!
//! [`InstallPipeline::inspect`] reads a source (a standalone `.jad`
//! descriptor or a payload archive), verifies what it can locally and
//! classifies the package against the store. It never downloads anything.
//!
//! [`InstallPipeline::commit`] takes the resulting [`InstallContext`],
//! fetches the payload if it is remote, verifies it, runs the transformer
//! and hands the result to the [`StoreWriter`].

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::cache;
use crate::cancel::CancellationToken;
use crate::descriptor::{Descriptor, StoreKey};
use crate::error::{
    Result, archive_not_found, archive_read_failed, cache_operation_failed, file_write_failed,
    integrity_mismatch, malformed_descriptor,
};
use crate::fetch::{FetchOptions, Fetcher, has_network_scheme};
use crate::hash;
use crate::progress::{PipelineStage, ProgressReporter, SilentProgress};
use crate::resolver::{InstallOutcome, Integrity, classify};
use crate::store::{EXECUTABLE_FILE, RESOURCE_FILE, Store, StoreRecord, StoreWriter};
use crate::transform::Transformer;

/// Extension of standalone descriptor files
pub const DESCRIPTOR_EXTENSION: &str = "jad";
/// Extension of payload archives
pub const ARCHIVE_EXTENSION: &str = "jar";

/// Where the payload archive of a package lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveLocation {
    /// Archive present on the local filesystem
    Local(PathBuf),
    /// Archive to be downloaded at commit time
    Remote(String),
}

impl std::fmt::Display for ArchiveLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveLocation::Local(path) => write!(f, "{}", path.display()),
            ArchiveLocation::Remote(uri) => f.write_str(uri),
        }
    }
}

/// Everything `inspect` learned about a source, consumed by `commit`
#[derive(Debug, Clone)]
pub struct InstallContext {
    source: PathBuf,
    descriptor: Descriptor,
    manifest: Option<Descriptor>,
    archive: ArchiveLocation,
    integrity: Integrity,
    key: StoreKey,
    previous: Option<StoreRecord>,
    outcome: InstallOutcome,
}

impl InstallContext {
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Descriptor the package was selected by
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The archive's embedded manifest, when it was read
    pub fn manifest(&self) -> Option<&Descriptor> {
        self.manifest.as_ref()
    }

    pub fn archive(&self) -> &ArchiveLocation {
        &self.archive
    }

    pub fn integrity(&self) -> Integrity {
        self.integrity
    }

    /// Store key the package will be installed under
    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Installed application this package replaces
    pub fn previous(&self) -> Option<&StoreRecord> {
        self.previous.as_ref()
    }

    pub fn outcome(&self) -> InstallOutcome {
        self.outcome
    }

    /// Treat `previous` as the installed version of this application.
    ///
    /// Used to upgrade an application whose name or vendor changed: on commit
    /// its user data moves to the new key and its old slot is removed.
    #[must_use]
    pub fn with_previous(&self, previous: StoreRecord) -> Self {
        let mut next = self.clone();
        next.outcome = outcome_for(&next.descriptor, Some(&previous), next.integrity);
        next.previous = Some(previous);
        next
    }
}

fn outcome_for(
    descriptor: &Descriptor,
    previous: Option<&StoreRecord>,
    integrity: Integrity,
) -> InstallOutcome {
    // A descriptor that disagrees with its archive is never installable,
    // installed or not.
    if integrity == Integrity::Mismatch {
        return InstallOutcome::Unmatched;
    }
    classify(descriptor.version(), previous, integrity)
}

fn is_descriptor_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION))
}

/// Archive next to `descriptor_path`, under the declared name or the
/// descriptor's own base name.
fn local_archive_candidate(descriptor_path: &Path, location: &str) -> Option<PathBuf> {
    let dir = descriptor_path.parent().unwrap_or_else(|| Path::new(""));
    let declared = dir.join(location.trim());
    if declared.is_file() {
        return Some(declared);
    }
    let stem = descriptor_path.file_stem()?;
    let sibling = dir.join(stem).with_extension(ARCHIVE_EXTENSION);
    sibling.is_file().then_some(sibling)
}

/// Drives `inspect` and `commit` against one store.
///
/// Commits for different store keys may run concurrently from separate
/// pipelines. Two commits for the same key must not overlap; the outcome of
/// doing so is undefined.
pub struct InstallPipeline {
    store: Store,
    transformer: Box<dyn Transformer>,
    fetcher: Fetcher,
    payload_dir: PathBuf,
    cancel: CancellationToken,
    progress: Box<dyn ProgressReporter>,
}

impl InstallPipeline {
    /// Create a pipeline with default fetch timeouts and the default cache
    pub fn new(store: Store, transformer: impl Transformer + 'static) -> Result<Self> {
        let payload_dir = cache::payloads_dir(&cache::cache_dir()?);
        Ok(Self {
            store,
            transformer: Box::new(transformer),
            fetcher: Fetcher::new(FetchOptions::default())?,
            payload_dir,
            cancel: CancellationToken::new(),
            progress: Box::new(SilentProgress),
        })
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher.with_cancellation(self.cancel.clone());
        self
    }

    /// Download remote payloads into `dir`
    #[must_use]
    pub fn with_payload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.payload_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: impl ProgressReporter + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.fetcher = self.fetcher.with_cancellation(token.clone());
        self.cancel = token;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Read and classify `source` without touching the store or the network
    pub fn inspect(&self, source: &Path) -> Result<InstallContext> {
        self.progress.stage(PipelineStage::Inspect);
        tracing::debug!(source = %source.display(), "inspecting");

        let (descriptor, manifest, archive, integrity) = if is_descriptor_file(source) {
            self.inspect_descriptor(source)?
        } else {
            if !source.is_file() {
                return Err(archive_not_found(source.display().to_string()));
            }
            let manifest = Descriptor::from_archive(source)?;
            (
                manifest.clone(),
                Some(manifest),
                ArchiveLocation::Local(source.to_path_buf()),
                Integrity::Verified,
            )
        };

        let key = descriptor.store_key();
        // Integrity mismatch decides the outcome on its own
        let previous = if integrity == Integrity::Mismatch {
            None
        } else {
            self.store.find(descriptor.name(), descriptor.vendor())?
        };
        let outcome = outcome_for(&descriptor, previous.as_ref(), integrity);
        tracing::info!(
            app = %descriptor,
            key = %key,
            outcome = %outcome,
            "inspected package"
        );

        Ok(InstallContext {
            source: source.to_path_buf(),
            descriptor,
            manifest,
            archive,
            integrity,
            key,
            previous,
            outcome,
        })
    }

    fn inspect_descriptor(
        &self,
        source: &Path,
    ) -> Result<(Descriptor, Option<Descriptor>, ArchiveLocation, Integrity)> {
        let descriptor = Descriptor::from_file(source, true)?;
        let location = descriptor
            .payload_location()
            .ok_or_else(|| {
                malformed_descriptor(
                    source.display().to_string(),
                    format!("missing {}", crate::descriptor::PAYLOAD_URL_KEY),
                )
            })?
            .to_string();

        if !has_network_scheme(&location) {
            if let Some(local) = local_archive_candidate(source, &location) {
                self.progress.stage(PipelineStage::Verify);
                let manifest = Descriptor::from_archive(&local)?;
                let integrity = if manifest == descriptor {
                    Integrity::Verified
                } else {
                    tracing::warn!(
                        descriptor = %descriptor,
                        manifest = %manifest,
                        "descriptor does not match archive manifest"
                    );
                    Integrity::Mismatch
                };
                return Ok((
                    descriptor,
                    Some(manifest),
                    ArchiveLocation::Local(local),
                    integrity,
                ));
            }
        }

        tracing::debug!(location = %location, "payload is remote, verification deferred");
        Ok((
            descriptor,
            None,
            ArchiveLocation::Remote(location),
            Integrity::Deferred,
        ))
    }

    /// Install the package described by `ctx`.
    ///
    /// The payload is copied or downloaded straight into the staging
    /// directory and its manifest is checked against the descriptor again,
    /// whatever `inspect` found. The outcome is not re-checked: installing an
    /// older or equal version is allowed. Errors before the slot swap leave
    /// the store untouched; later ones are `PromotionFailed`.
    pub fn commit(&self, ctx: &InstallContext) -> Result<StoreRecord> {
        if ctx.integrity == Integrity::Mismatch {
            let found = ctx
                .manifest
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            return Err(integrity_mismatch(ctx.descriptor.to_string(), found));
        }
        self.cancel.check()?;

        let writer = StoreWriter::new(&self.store).with_cancellation(self.cancel.clone());
        let staging = writer.stage()?;
        let resources = staging.join(RESOURCE_FILE);
        match &ctx.archive {
            ArchiveLocation::Local(path) => copy_archive(path, &resources)?,
            ArchiveLocation::Remote(uri) => self.fetch(uri, &resources)?,
        }

        self.cancel.check()?;
        self.progress.stage(PipelineStage::Verify);
        let manifest = Descriptor::from_archive(&resources)?;
        if manifest != ctx.descriptor {
            return Err(integrity_mismatch(
                ctx.descriptor.to_string(),
                manifest.to_string(),
            ));
        }
        let merged = manifest.merge(&ctx.descriptor);
        let digest = hash::hash_file(&resources)?;

        self.cancel.check()?;
        self.progress.stage(PipelineStage::Transform);
        self.transformer
            .transform(&resources, &staging.join(EXECUTABLE_FILE))?;

        self.cancel.check()?;
        self.progress.stage(PipelineStage::Populate);
        let record = writer.populate(&staging, &merged, digest)?;
        writer.promote(staging, &record, ctx.previous.as_ref(), self.progress.as_ref())?;

        tracing::info!(key = %record.key, version = %record.version, "installed");
        Ok(record)
    }

    /// `inspect` followed by `commit`, whatever the outcome short of `Unmatched`
    pub fn install(&self, source: &Path) -> Result<StoreRecord> {
        let ctx = self.inspect(source)?;
        self.commit(&ctx)
    }

    /// Download `uri` through the payload cache into `destination`.
    ///
    /// The cached file is read back through its open handle, so purging the
    /// cache meanwhile does not affect the install.
    fn fetch(&self, uri: &str, destination: &Path) -> Result<()> {
        self.progress.stage(PipelineStage::Fetch);
        fs::create_dir_all(&self.payload_dir).map_err(|e| {
            cache_operation_failed(format!(
                "Failed to create payload cache {}: {e}",
                self.payload_dir.display()
            ))
        })?;
        let mut payload = tempfile::Builder::new()
            .prefix("payload-")
            .suffix(".jar")
            .tempfile_in(&self.payload_dir)
            .map_err(|e| cache_operation_failed(format!("Failed to create payload file: {e}")))?;
        self.fetcher
            .download_to(uri, payload.as_file_mut(), self.progress.as_ref())?;

        let write_error =
            |e: io::Error| file_write_failed(destination.display().to_string(), e.to_string());
        let handle = payload.as_file_mut();
        handle.seek(SeekFrom::Start(0)).map_err(write_error)?;
        let mut staged = File::create(destination).map_err(write_error)?;
        io::copy(handle, &mut staged).map_err(write_error)?;
        Ok(())
    }
}

/// Copy a local payload archive into staging
fn copy_archive(source: &Path, destination: &Path) -> Result<()> {
    if !source.is_file() {
        return Err(archive_not_found(source.display().to_string()));
    }
    fs::copy(source, destination)
        .map(|_| ())
        .map_err(|e| archive_read_failed(source.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_descriptor_file() {
        assert!(is_descriptor_file(Path::new("game.jad")));
        assert!(is_descriptor_file(Path::new("GAME.JAD")));
        assert!(!is_descriptor_file(Path::new("game.jar")));
        assert!(!is_descriptor_file(Path::new("game")));
    }

    #[test]
    fn test_local_archive_candidate() {
        let temp = tempfile::TempDir::new().unwrap();
        let jad = temp.path().join("Snake.jad");
        fs::write(&jad, "").unwrap();
        assert_eq!(local_archive_candidate(&jad, "snake-1.0.jar"), None);

        fs::write(temp.path().join("Snake.jar"), "").unwrap();
        assert_eq!(
            local_archive_candidate(&jad, "snake-1.0.jar"),
            Some(temp.path().join("Snake.jar"))
        );

        fs::write(temp.path().join("snake-1.0.jar"), "").unwrap();
        assert_eq!(
            local_archive_candidate(&jad, "snake-1.0.jar"),
            Some(temp.path().join("snake-1.0.jar"))
        );
    }

    #[test]
    fn test_mismatch_is_unmatched_without_record() {
        let descriptor = Descriptor::parse(
            "MIDlet-Name: Snake\nMIDlet-Vendor: Acme\nMIDlet-Version: 1.0\n",
            true,
        )
        .unwrap();
        assert_eq!(
            outcome_for(&descriptor, None, Integrity::Mismatch),
            InstallOutcome::Unmatched
        );
        assert_eq!(
            outcome_for(&descriptor, None, Integrity::Deferred),
            InstallOutcome::New
        );
    }
}
