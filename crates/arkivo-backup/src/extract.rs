//! Media Reference Extractor.
//!
//! Scans a fixture document and determines, for every field typed as a file
//! reference, the storage-relative path it points to. A single bad reference
//! never aborts the scan: unresolvable fields become explicit `Skipped`
//! outcomes (logged at debug) so the aggregate result stays inspectable, and
//! the pipeline keeps partial information rather than failing.

use std::collections::BTreeSet;
use url::Url;

use crate::datastore::DataStore;
use arkivo_core::models::{FixtureDocument, ModelId};

/// Why one field value did not yield a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No descriptor for this model/field.
    UnknownField,
    /// Value was not a string.
    NonStringValue,
    /// Value was an empty string (no file attached).
    EmptyValue,
    /// Value looked like a URL but could not be parsed.
    InvalidUrl,
}

/// A field that was considered but produced no reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRef {
    pub model: ModelId,
    pub field: String,
    pub reason: SkipReason,
}

/// Result of scanning one fixture: the deduplicated reference set plus every
/// skipped field. Multiple records referencing the same asset collapse to one
/// entry; iteration order is deterministic.
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub refs: BTreeSet<String>,
    pub skipped: Vec<SkippedRef>,
}

/// Scan `fixture` for media references.
///
/// `public_url_prefix` is the URL path prefix under which assets are publicly
/// served (e.g. `media/`); it is stripped from extracted paths so the result
/// is storage-relative.
pub fn extract_media_refs(
    fixture: &FixtureDocument,
    store: &dyn DataStore,
    public_url_prefix: Option<&str>,
) -> ExtractReport {
    let mut report = ExtractReport::default();

    for record in fixture.iter() {
        for (field, value) in &record.fields {
            let descriptor = match store.field_descriptor(&record.model, field) {
                Some(descriptor) => descriptor,
                None => {
                    report.skip(record.model.clone(), field, SkipReason::UnknownField);
                    continue;
                }
            };
            if !descriptor.is_file_reference {
                continue;
            }

            let raw = match value.as_str() {
                Some(s) => s,
                None => {
                    if value.is_null() {
                        report.skip(record.model.clone(), field, SkipReason::EmptyValue);
                    } else {
                        report.skip(record.model.clone(), field, SkipReason::NonStringValue);
                    }
                    continue;
                }
            };
            if raw.is_empty() {
                report.skip(record.model.clone(), field, SkipReason::EmptyValue);
                continue;
            }

            match normalize_reference(raw, public_url_prefix) {
                Some(path) => {
                    report.refs.insert(path);
                }
                None => report.skip(record.model.clone(), field, SkipReason::InvalidUrl),
            }
        }
    }

    tracing::debug!(
        refs = report.refs.len(),
        skipped = report.skipped.len(),
        "Media reference extraction finished"
    );

    report
}

impl ExtractReport {
    fn skip(&mut self, model: ModelId, field: &str, reason: SkipReason) {
        tracing::debug!(model = %model, field = %field, reason = ?reason, "Skipping media reference");
        self.skipped.push(SkippedRef {
            model,
            field: field.to_string(),
            reason,
        });
    }
}

/// Normalize a field value to a storage-relative path: take the path
/// component of absolute URLs, strip a leading separator, strip the public
/// prefix. Returns None when nothing usable remains.
fn normalize_reference(value: &str, public_url_prefix: Option<&str>) -> Option<String> {
    let mut path = if value.starts_with("http://") || value.starts_with("https://") {
        match Url::parse(value) {
            Ok(url) => url.path().to_string(),
            Err(_) => return None,
        }
    } else {
        value.to_string()
    };

    if let Some(stripped) = path.strip_prefix('/') {
        path = stripped.to_string();
    }

    if let Some(prefix) = public_url_prefix {
        let prefix = prefix.trim_start_matches('/');
        if let Some(stripped) = path.strip_prefix(prefix) {
            path = stripped.trim_start_matches('/').to_string();
        }
    }

    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}
