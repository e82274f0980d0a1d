//! Raw feed entry → canonical job record.
//!
//! Pure mapping with fallback chains; no I/O. The only "failure" is an entry
//! without an identifier, which yields `None`.

use chrono::{DateTime, Utc};

use crate::types::raw::{RawJobEntry, RawTags};
use crate::types::record::{
    CanonicalJobRecord, DEFAULT_LOCATION, FULL_TIME, NOT_AVAILABLE, TAG_SEPARATOR,
};

/// Normalize an entry, stamping it with the current time.
pub fn normalize(entry: &RawJobEntry, category: &str) -> Option<CanonicalJobRecord> {
    normalize_at(entry, category, Utc::now())
}

/// Normalize an entry with an explicit `fetched_at`.
pub fn normalize_at(
    entry: &RawJobEntry,
    category: &str,
    fetched_at: DateTime<Utc>,
) -> Option<CanonicalJobRecord> {
    // Whitespace-only ids are blank, but a kept id is stored verbatim
    let id = entry.id.as_deref().filter(|id| !id.trim().is_empty())?;

    let title = entry
        .position
        .as_ref()
        .or(entry.title.as_ref())
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Some(CanonicalJobRecord {
        id: id.to_string(),
        title,
        company: or_placeholder(&entry.company, NOT_AVAILABLE),
        tags: join_tags(&entry.tags),
        location: or_placeholder(&entry.location, DEFAULT_LOCATION),
        job_type: FULL_TIME.to_string(),
        date_posted: or_placeholder(&entry.date, NOT_AVAILABLE),
        url: or_placeholder(&entry.url, NOT_AVAILABLE),
        source_category: category.to_string(),
        fetched_at,
    })
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    value.clone().unwrap_or_else(|| placeholder.to_string())
}

fn join_tags(tags: &RawTags) -> String {
    match tags {
        RawTags::Strings(tags) => tags.join(TAG_SEPARATOR),
        RawTags::Missing | RawTags::Other => NOT_AVAILABLE.to_string(),
    }
}
