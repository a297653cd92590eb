//! Read access to payload archives
//!
//! Payload archives are zip files carrying an embedded manifest at
//! `META-INF/MANIFEST.MF` plus classes and resources.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{AppstowError, Result, archive_read_failed, file_write_failed};

/// Location of the embedded manifest inside an archive
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

fn read_error(path: &Path, reason: impl ToString) -> AppstowError {
    archive_read_failed(path.display().to_string(), reason.to_string())
}

fn open(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    ZipArchive::new(file).map_err(|e| read_error(path, e))
}

/// Resolve an entry name, tolerating a leading slash and letter case differences.
fn resolve_entry_name(archive: &ZipArchive<File>, entry: &str) -> Option<String> {
    let wanted = entry.trim().trim_start_matches('/');
    if wanted.is_empty() {
        return None;
    }
    let mut fallback = None;
    for name in archive.file_names() {
        if name == wanted {
            return Some(name.to_string());
        }
        if fallback.is_none() && name.eq_ignore_ascii_case(wanted) {
            fallback = Some(name.to_string());
        }
    }
    fallback
}

/// Read a single archive entry into memory
pub fn read_entry(path: &Path, entry: &str) -> Result<Vec<u8>> {
    let mut archive = open(path)?;
    let name = resolve_entry_name(&archive, entry)
        .ok_or_else(|| read_error(path, format!("entry '{entry}' not found")))?;
    let mut file = archive.by_name(&name).map_err(|e| read_error(path, e))?;
    let mut buf = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut buf).map_err(|e| read_error(path, e))?;
    Ok(buf)
}

/// Read the embedded manifest text of an archive
pub fn read_manifest(path: &Path) -> Result<String> {
    let bytes = read_entry(path, MANIFEST_ENTRY)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract a single archive entry to `dest`
pub fn extract_entry(path: &Path, entry: &str, dest: &Path) -> Result<()> {
    let mut archive = open(path)?;
    let name = resolve_entry_name(&archive, entry)
        .ok_or_else(|| read_error(path, format!("entry '{entry}' not found")))?;
    let mut file = archive.by_name(&name).map_err(|e| read_error(path, e))?;
    let write_error = |e: io::Error| file_write_failed(dest.display().to_string(), e.to_string());
    let mut out = fs::File::create(dest).map_err(write_error)?;
    io::copy(&mut file, &mut out).map_err(write_error)?;
    Ok(())
}
