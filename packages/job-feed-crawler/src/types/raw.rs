//! Raw feed entries, decoded defensively.
//!
//! The feed is a JSON array of loosely-typed objects: any field may be
//! missing, null, or of an unexpected type. Each field is decoded on its own
//! so one bad field never discards the rest of the entry.

use serde_json::{Map, Value};

use crate::error::{FetchError, FetchResult};

/// Tag field as found in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawTags {
    /// Field absent or null
    #[default]
    Missing,
    /// Array whose elements are all strings, in source order
    Strings(Vec<String>),
    /// Present but not a string array
    Other,
}

/// One feed entry with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawJobEntry {
    pub id: Option<String>,
    pub position: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub tags: RawTags,
    pub location: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

impl RawJobEntry {
    /// Decode an entry from a JSON object, field by field.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            id: text_field(object, "id"),
            position: text_field(object, "position"),
            title: text_field(object, "title"),
            company: text_field(object, "company"),
            tags: tags_field(object),
            location: text_field(object, "location"),
            date: text_field(object, "date"),
            url: text_field(object, "url"),
        }
    }

    /// Create an entry with just an id (builder pattern for tests and mocks).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Set the primary title field.
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Set the secondary title field.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the company.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the tag list.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = RawTags::Strings(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the posting date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the posting URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Scalar field as text. Null, arrays and objects count as absent.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn tags_field(object: &Map<String, Value>) -> RawTags {
    match object.get("tags") {
        None | Some(Value::Null) => RawTags::Missing,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(RawTags::Strings)
            .unwrap_or(RawTags::Other),
        Some(_) => RawTags::Other,
    }
}

/// Decoded body of one category feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedPayload {
    /// Object entries in feed order
    pub entries: Vec<RawJobEntry>,

    /// Array elements that were not JSON objects
    pub skipped: usize,
}

impl RawFeedPayload {
    /// Build a payload from already-decoded entries.
    pub fn from_entries(entries: Vec<RawJobEntry>) -> Self {
        Self {
            entries,
            skipped: 0,
        }
    }

    /// Parse a feed body.
    ///
    /// Unparseable JSON is a [`FetchError::MalformedPayload`]. A valid document
    /// that is not an array yields no entries; non-object elements are skipped.
    pub fn parse(body: &str) -> FetchResult<Self> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        Ok(Self::from_value(value))
    }

    /// Decode an already-parsed JSON document.
    pub fn from_value(value: Value) -> Self {
        let Value::Array(items) = value else {
            return Self::default();
        };

        let mut payload = Self::default();
        for item in &items {
            match item {
                Value::Object(object) => payload.entries.push(RawJobEntry::from_object(object)),
                _ => payload.skipped += 1,
            }
        }
        payload
    }

    /// Number of object entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the feed had no object entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_fields_individually() {
        let value = json!({
            "id": 42,
            "position": "Engineer",
            "company": null,
            "tags": ["rust", "aws"],
            "location": ["not", "text"],
            "url": "https://x/42"
        });
        let entry = RawJobEntry::from_object(value.as_object().unwrap());

        assert_eq!(entry.id.as_deref(), Some("42"));
        assert_eq!(entry.position.as_deref(), Some("Engineer"));
        assert_eq!(entry.company, None);
        assert_eq!(entry.tags, RawTags::Strings(vec!["rust".into(), "aws".into()]));
        assert_eq!(entry.location, None);
        assert_eq!(entry.date, None);
        assert_eq!(entry.url.as_deref(), Some("https://x/42"));
    }

    #[test]
    fn test_mixed_tag_array_is_other() {
        let value = json!({"id": "1", "tags": ["rust", 3]});
        let entry = RawJobEntry::from_object(value.as_object().unwrap());
        assert_eq!(entry.tags, RawTags::Other);

        let value = json!({"id": "1", "tags": "rust"});
        let entry = RawJobEntry::from_object(value.as_object().unwrap());
        assert_eq!(entry.tags, RawTags::Other);
    }

    #[test]
    fn test_parse_skips_non_objects() {
        let payload = RawFeedPayload::parse(r#"[{"legal": "notice"}, 7, "x", {"id": "1"}]"#).unwrap();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.skipped, 2);
        assert_eq!(payload.entries[1].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_non_array_is_empty() {
        let payload = RawFeedPayload::parse(r#"{"id": "1"}"#).unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.skipped, 0);
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = RawFeedPayload::parse("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }
}
