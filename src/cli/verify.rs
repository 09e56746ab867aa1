//! Verify command - authenticate every record with the current key.

use tracing::{debug, warn};

use crate::cli::output;
use crate::core::cipher::AesGcm;
use crate::core::domain::Record;
use crate::core::journal::Journal;
use crate::error::{Error, Result};

/// Decrypt every record; fail on the first one that does not authenticate.
pub fn execute() -> Result<()> {
    let settings = crate::cli::settings()?;
    let key = settings.key_provider().resolve_key()?;
    let records: Vec<Record> = Journal::new(&settings.data_path).read()?;

    for (i, record) in records.iter().enumerate() {
        if let Err(e) = record.open(&AesGcm, &key) {
            warn!(record = i + 1, "record failed verification");
            return Err(Error::Other(format!(
                "record {} ({}) failed verification: {}",
                i + 1,
                record.entry_id.as_deref().unwrap_or("no id"),
                e
            )));
        }
        debug!(record = i + 1, "verified");
    }

    output::success(&format!(
        "{} records verified with key {}",
        records.len(),
        key.fingerprint()
    ));
    Ok(())
}
