//! Canonical job record - the unit of output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for absent text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Location used when the feed omits one.
pub const DEFAULT_LOCATION: &str = "Remote";

/// Job type for every record of this feed shape.
pub const FULL_TIME: &str = "Full-time";

/// Separator between tags in the display string.
pub const TAG_SEPARATOR: &str = ", ";

/// Column headers in output order.
pub const COLUMNS: [&str; 10] = [
    "Job ID",
    "Job Title",
    "Company Name",
    "Job Tags",
    "Location",
    "Job Type",
    "Date Posted",
    "Job URL",
    "Category",
    "Scraped Date",
];

/// A normalized job posting, independent of the feed's shape.
///
/// Field order is the column order of the flat file. `tags` is a display
/// string (joined with [`TAG_SEPARATOR`]); downstream analysis splits it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalJobRecord {
    /// Source-assigned identifier, never empty
    #[serde(rename = "Job ID")]
    pub id: String,

    #[serde(rename = "Job Title")]
    pub title: String,

    #[serde(rename = "Company Name")]
    pub company: String,

    /// Joined tags, `"N/A"` when the feed had no tag list
    #[serde(rename = "Job Tags")]
    pub tags: String,

    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "Job Type")]
    pub job_type: String,

    /// Raw source value, not reformatted
    #[serde(rename = "Date Posted")]
    pub date_posted: String,

    #[serde(rename = "Job URL")]
    pub url: String,

    /// Feed category the record was fetched from
    #[serde(rename = "Category")]
    pub source_category: String,

    /// When the record was normalized
    #[serde(rename = "Scraped Date", with = "scraped_date")]
    pub fetched_at: DateTime<Utc>,
}

impl CanonicalJobRecord {
    /// Split the tag display string back into individual tags.
    ///
    /// Returns an empty list for the `"N/A"` placeholder.
    pub fn tag_list(&self) -> Vec<&str> {
        if self.tags == NOT_AVAILABLE {
            return Vec::new();
        }
        self.tags
            .split(TAG_SEPARATOR)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// `Scraped Date` column format.
mod scraped_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
