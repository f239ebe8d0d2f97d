//! Archive Packager.
//!
//! Combines the fixture document, the staged media tree, and a generated
//! manifest into one deterministic zip archive. In-archive names are fixed by
//! the format contract, never derived from staging paths: the fixture is
//! always `backup.json`, assets live under `media/` preserving their relative
//! paths, and `backup_manifest.json` is written last. All entries are
//! deflate-compressed. Synchronous I/O throughout; callers on the async
//! runtime wrap this in `spawn_blocking`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::materialize::MEDIA_SUBDIR;
use arkivo_core::models::{
    BackupManifest, ARCHIVE_MEDIA_PREFIX, FIXTURE_FILE_NAME, MANIFEST_FILE_NAME,
};

/// Build the archive at `output_path`.
///
/// `fixture_path` is the serialized fixture file; `staging_root` is the tree
/// the materializer populated (its `media/` subtree may be absent or empty).
/// Returns `output_path` back for convenience.
pub fn package_archive(
    fixture_path: &Path,
    staging_root: &Path,
    output_path: &Path,
    backup_type: &str,
    created_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create archive {}", output_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    // Fixture first, under its fixed in-archive name.
    zip.start_file(FIXTURE_FILE_NAME, options)
        .context("Failed to add fixture to archive")?;
    let mut fixture = File::open(fixture_path)
        .with_context(|| format!("Failed to open fixture {}", fixture_path.display()))?;
    std::io::copy(&mut fixture, &mut zip).context("Failed to write fixture to archive")?;

    // Staged assets, path-preserving under media/.
    let media_root = staging_root.join(MEDIA_SUBDIR);
    if media_root.is_dir() {
        for relative in collect_sorted(&media_root, Path::new(""))? {
            let entry_name = format!("{}{}", ARCHIVE_MEDIA_PREFIX, zip_entry_name(&relative));
            zip.start_file(&entry_name, options)
                .with_context(|| format!("Failed to add {} to archive", entry_name))?;
            let mut asset = File::open(media_root.join(&relative))?;
            std::io::copy(&mut asset, &mut zip)
                .with_context(|| format!("Failed to write {} to archive", entry_name))?;
        }
    }

    // Manifest last, always.
    let manifest = BackupManifest::new(backup_type, created_at);
    zip.start_file(MANIFEST_FILE_NAME, options)
        .context("Failed to add manifest to archive")?;
    zip.write_all(&serde_json::to_vec_pretty(&manifest)?)
        .context("Failed to write manifest to archive")?;

    zip.finish().context("Failed to finalize archive")?;

    Ok(output_path.to_path_buf())
}

/// Walk a directory tree, returning file paths relative to `root`, sorted so
/// the archive layout is deterministic.
fn collect_sorted(root: &Path, prefix: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<_> = std::fs::read_dir(root.join(prefix))
        .with_context(|| format!("Failed to read staging dir {}", root.join(prefix).display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut files = Vec::new();
    for entry in entries {
        let relative = prefix.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            files.extend(collect_sorted(root, &relative)?);
        } else {
            files.push(relative);
        }
    }
    Ok(files)
}

/// Zip entry names always use forward slashes, whatever the host separator.
fn zip_entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
