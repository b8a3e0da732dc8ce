use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder used when neither the curator nor the scrape supplied a
/// description.
pub const NO_DESCRIPTION: &str = "No description";

/// One catalog entry describing a single editor plugin.
///
/// `name` is the identity of the record: uniqueness within a catalog is
/// case-insensitive, but the original casing is preserved for display.
/// Serialized field names stay camelCase so the catalog file remains
/// compatible with previously published data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Plugin {
    /// Case-insensitive identity key used for merging and canonical ordering.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Schema check applied on every load and before every persist.
    /// Returns the first violated constraint, never panics.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must be non-empty".into());
        }
        if Url::parse(&self.url).is_err() {
            return Err(format!("url '{}' is not a well-formed URL", self.url));
        }
        for tag in &self.tags {
            if tag != &tag.to_lowercase() {
                return Err(format!("tag '{tag}' must be lowercase"));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for tag in &self.tags {
            if !seen.insert(tag.as_str()) {
                return Err(format!("duplicate tag '{tag}'"));
            }
        }
        Ok(())
    }
}
