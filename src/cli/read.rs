//! Read command - decrypt and print entries.

use serde::Serialize;
use tracing::debug;

use crate::cli::output;
use crate::core::cipher::AesGcm;
use crate::core::domain::{Metadata, Record};
use crate::core::journal::Journal;
use crate::error::Result;

#[derive(Serialize)]
struct DecryptedEntry<'a> {
    entry_id: Option<&'a str>,
    timestamp: &'a str,
    text: String,
    metadata: &'a Metadata,
    tags: &'a [String],
}

/// Print entries, oldest first.
pub fn execute(last: Option<usize>, json: bool) -> Result<()> {
    let settings = crate::cli::settings()?;
    let key = settings.key_provider().resolve_key()?;

    let records: Vec<Record> = Journal::new(&settings.data_path).read()?;
    let skip = last.map_or(0, |n| records.len().saturating_sub(n));
    debug!(total = records.len(), skip, "reading journal");

    let entries = records[skip..]
        .iter()
        .map(|record| {
            Ok(DecryptedEntry {
                entry_id: record.entry_id.as_deref(),
                timestamp: &record.timestamp,
                text: record.open(&AesGcm, &key)?,
                metadata: &record.metadata,
                tags: &record.tags,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(crate::error::StorageError::from)?;
        println!("{}", rendered);
        return Ok(());
    }

    if entries.is_empty() {
        output::dimmed("no entries");
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            output::rule();
        }
        let mut heading = entry.timestamp.to_string();
        if !entry.tags.is_empty() {
            heading.push_str(&format!("  #{}", entry.tags.join(" #")));
        }
        output::header(&heading);
        if !entry.metadata.is_empty() {
            output::dimmed(&serde_json::Value::Object(entry.metadata.clone()).to_string());
        }
        println!("{}", entry.text);
    }

    Ok(())
}
