//! Record types.
//!
//! A [`Record`] is one line of the encrypted journal. A [`PlaintextRecord`]
//! is one line of the optional local, human-readable copy.

use serde::{Deserialize, Serialize};

use super::entry::Metadata;
use crate::core::cipher::{self, Cipher, Nonce, Sealed};
use crate::core::constants::SCHEMA_VERSION;
use crate::core::key::Key;
use crate::error::{CipherError, Result};

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// An encrypted journal record.
///
/// Unknown fields are ignored on read; missing `metadata` and `tags` read
/// as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    pub timestamp: String,
    pub ciphertext: String,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_label: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Record {
    /// Build a record from a sealed entry.
    pub fn seal(
        entry_id: String,
        timestamp: String,
        sealed: &Sealed,
        key_label: Option<String>,
        metadata: Metadata,
        tags: Vec<String>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entry_id: Some(entry_id),
            timestamp,
            ciphertext: cipher::encode_field(&sealed.ciphertext),
            nonce: sealed.nonce.to_base64(),
            key_label,
            metadata,
            tags,
        }
    }

    /// Decrypt the record's text.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Decode` on malformed base64 fields,
    /// `CipherError::Authentication` if the tag does not verify, or
    /// `CipherError::Utf8` if the plaintext is not UTF-8.
    pub fn open(&self, cipher: &dyn Cipher, key: &Key) -> Result<String> {
        let nonce = Nonce::from_base64(&self.nonce)?;
        let ciphertext = cipher::decode_field("ciphertext", &self.ciphertext)?;
        let plaintext = cipher.decrypt(key, &nonce, &ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Utf8.into())
    }

    /// Serialize as a single JSON line, without the trailing newline.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self).map_err(crate::error::StorageError::from)?)
    }
}

/// A plaintext copy of an entry, kept out of version control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaintextRecord {
    pub schema_version: u32,
    pub entry_id: String,
    pub timestamp: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub tags: Vec<String>,
}
