//! Key acquisition.
//!
//! A [`KeyProvider`] walks an ordered list of [`KeySource`]s and returns the
//! first key found. The order is data, not control flow: extend the list to
//! add a source.
//!
//! ## Adding a New Source
//!
//! 1. Add a variant to [`KeySource`]
//! 2. Implement its lookup in a new file (e.g., `keyring.rs`)
//! 3. Dispatch to it from [`KeySource::load`]

mod env;
mod file;

use std::fmt;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::constants::KEY_LEN;
use crate::error::{KeyError, Result};

pub use file::create_key_file;

/// A 256-bit symmetric key.
///
/// Zeroed on drop. `Debug` never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Decode a base64 key, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::Format` on invalid base64 or a length other than 32.
    pub fn from_base64(value: &str, source_name: &str) -> Result<Self> {
        let mut decoded = BASE64
            .decode(value.trim())
            .map_err(|e| KeyError::Format {
                source_name: source_name.to_string(),
                reason: base64_reason(&e).to_string(),
            })?;

        if decoded.len() != KEY_LEN {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(KeyError::Format {
                source_name: source_name.to_string(),
                reason: format!("expected {} bytes, got {}", KEY_LEN, actual),
            }
            .into());
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Base64 encoding of the key, for writing a new key file.
    pub(crate) fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Raw key bytes, for the cipher only.
    pub(crate) fn expose(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Short SHA-256 fingerprint that identifies the key without revealing it.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(<redacted>)")
    }
}

/// Where a key can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Environment variable holding a base64 key.
    Env(String),
    /// File holding a base64 key.
    File(PathBuf),
}

impl KeySource {
    /// Load the key from this source.
    ///
    /// Returns `Ok(None)` if the source is absent (unset variable, missing
    /// file). A present source with a malformed value is an error.
    pub fn load(&self) -> Result<Option<Key>> {
        match self {
            Self::Env(name) => env::load(name),
            Self::File(path) => file::load(path),
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(name) => write!(f, "${}", name),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves the key from an ordered list of sources.
#[derive(Debug, Clone)]
pub struct KeyProvider {
    sources: Vec<KeySource>,
}

impl KeyProvider {
    /// Create a provider over `sources`, highest priority first.
    pub fn new(sources: Vec<KeySource>) -> Self {
        Self { sources }
    }

    /// The default order: environment variable, then key file.
    pub fn env_then_file(env_var: Option<&str>, key_path: PathBuf) -> Self {
        let mut sources = Vec::with_capacity(2);
        if let Some(name) = env_var.filter(|n| !n.is_empty()) {
            sources.push(KeySource::Env(name.to_string()));
        }
        sources.push(KeySource::File(key_path));
        Self::new(sources)
    }

    /// Resolve the key.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NotFound` if no source is present, or
    /// `KeyError::Format` if the first present source is malformed.
    pub fn resolve_key(&self) -> Result<Key> {
        self.resolve_with_source().map(|(key, _)| key)
    }

    /// Resolve the key and report which source supplied it.
    pub fn resolve_with_source(&self) -> Result<(Key, &KeySource)> {
        for source in &self.sources {
            if let Some(key) = source.load()? {
                debug!(source = %source, "key resolved");
                return Ok((key, source));
            }
            debug!(source = %source, "key source absent");
        }

        let checked = self
            .sources
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(KeyError::NotFound { checked }.into())
    }
}

/// Describe a decode failure without echoing any key character.
fn base64_reason(err: &base64::DecodeError) -> &'static str {
    match err {
        base64::DecodeError::InvalidByte(..) => "invalid base64: unexpected character",
        base64::DecodeError::InvalidLength(_) => "invalid base64: bad length",
        base64::DecodeError::InvalidLastSymbol(..) => "invalid base64: bad final character",
        base64::DecodeError::InvalidPadding => "invalid base64: bad padding",
    }
}
