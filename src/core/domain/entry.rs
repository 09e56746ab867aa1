//! Entry type.
//!
//! Plaintext input to the pipeline. Lives only until it is encrypted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::{EntryError, Result};

/// Metadata attached to an entry.
pub type Metadata = Map<String, Value>;

/// A plaintext journal entry.
#[derive(Clone, PartialEq)]
pub struct Entry {
    text: String,
    metadata: Metadata,
    tags: Vec<String>,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("text_len", &self.text.len())
            .field("metadata", &self.metadata)
            .field("tags", &self.tags)
            .finish()
    }
}

impl Entry {
    /// Create an entry from its text.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::Empty` if the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(EntryError::Empty.into());
        }
        Ok(Self {
            text,
            metadata: Metadata::new(),
            tags: Vec::new(),
        })
    }

    /// Merge `metadata` into the entry; later keys override earlier ones.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.extend(metadata);
        self
    }

    /// Add tags, keeping first occurrence order and dropping duplicates.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into().trim().to_string();
            if !tag.is_empty() && !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Parse metadata from a JSON string; it must be an object.
///
/// # Errors
///
/// Returns `EntryError::InvalidMetadata` on invalid JSON or a non-object.
pub fn parse_metadata(json: &str) -> Result<Metadata> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| EntryError::InvalidMetadata(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(EntryError::InvalidMetadata(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Format a timestamp the way records store it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
