//! Asset Materializer.
//!
//! Copies referenced assets from the storage backend into the local staging
//! tree. The batch is tolerant by design: a backup that is 99% complete with
//! a logged list of missing assets is worth more than one that aborts on the
//! first absent blob, so per-asset failures degrade that asset to `missing`
//! and processing continues.

use anyhow::{Context, Result};
use futures::StreamExt;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use arkivo_storage::Storage;

/// Staging subdirectory assets are copied into (mirrors the in-archive
/// `media/` prefix).
pub const MEDIA_SUBDIR: &str = "media";

/// Partition of the input reference set: every input path lands in exactly
/// one of the two lists.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub missing: Vec<String>,
}

impl CopyReport {
    pub fn total(&self) -> usize {
        self.copied.len() + self.missing.len()
    }
}

/// Copy every referenced asset into `staging_root/media/<path>`.
///
/// Assets are streamed in bounded-size chunks, never fully buffered. An
/// existence-check miss or any read/write error during one copy records that
/// path as missing; only failure to create the staging tree itself aborts.
pub async fn materialize_assets(
    storage: &dyn Storage,
    refs: &BTreeSet<String>,
    staging_root: &Path,
) -> Result<CopyReport> {
    let media_root = staging_root.join(MEDIA_SUBDIR);
    fs::create_dir_all(&media_root)
        .await
        .with_context(|| format!("Failed to create staging tree {}", media_root.display()))?;

    let mut report = CopyReport::default();

    for path in refs {
        match copy_one(storage, path, &media_root).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Asset captured");
                report.copied.push(path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Asset missing or unreadable, skipping");
                report.missing.push(path.clone());
            }
        }
    }

    tracing::info!(
        copied = report.copied.len(),
        missing = report.missing.len(),
        "Asset materialization finished"
    );

    Ok(report)
}

async fn copy_one(storage: &dyn Storage, path: &str, media_root: &Path) -> Result<()> {
    let dest = staging_path(media_root, path)?;

    let found = storage
        .exists(path)
        .await
        .with_context(|| format!("Existence check failed for {}", path))?;
    if !found {
        anyhow::bail!("not found in storage");
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut stream = storage.download_stream(path).await?;
    let mut file = fs::File::create(&dest).await?;

    let result: Result<()> = async {
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }
    .await;

    if result.is_err() {
        // Drop the partial file; the path is reported missing.
        let _ = fs::remove_file(&dest).await;
    }
    result
}

/// Resolve a reference to its staging destination, rejecting paths that would
/// escape the staging root.
fn staging_path(media_root: &Path, reference: &str) -> Result<PathBuf> {
    let relative = Path::new(reference);
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => anyhow::bail!("reference escapes the staging root"),
        }
    }
    Ok(media_root.join(relative))
}
