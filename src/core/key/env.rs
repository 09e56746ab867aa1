//! Environment variable key source.

use zeroize::Zeroize;

use super::Key;
use crate::error::Result;

/// Read a base64 key from `name`.
///
/// An unset or blank variable is absent, not an error.
pub(super) fn load(name: &str) -> Result<Option<Key>> {
    let Ok(mut value) = std::env::var(name) else {
        return Ok(None);
    };
    if value.trim().is_empty() {
        return Ok(None);
    }

    let key = Key::from_base64(&value, &format!("${}", name));
    value.zeroize();
    key.map(Some)
}
