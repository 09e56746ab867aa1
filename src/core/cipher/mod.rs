//! Authenticated encryption.
//!
//! The pipeline and journal only see the [`Cipher`] trait; the concrete
//! AEAD lives in its own file.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file (e.g., `chacha.rs`)
//! 3. Re-export from this module

mod aes;

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::core::constants::NONCE_LEN;
use crate::core::key::Key;
use crate::error::{CipherError, Result};

pub use aes::AesGcm;

/// AEAD backend trait.
///
/// `encrypt` picks a fresh nonce per call and returns it with the
/// ciphertext. `decrypt` must fail hard when the tag does not verify.
pub trait Cipher {
    /// Encrypt `plaintext` under `key` with a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the backend rejects the input.
    fn encrypt(&self, key: &Key, plaintext: &[u8]) -> Result<Sealed>;

    /// Decrypt and authenticate `ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Authentication` on a wrong key, a wrong nonce,
    /// or any modification of the ciphertext or tag.
    fn decrypt(&self, key: &Key, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// A 96-bit nonce.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce {
    bytes: [u8; NONCE_LEN],
}

impl Nonce {
    /// Draw a nonce from the OS CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Build a nonce from exactly 12 bytes.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidNonce` on any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; NONCE_LEN] =
            bytes.try_into().map_err(|_| CipherError::InvalidNonce {
                expected: NONCE_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Decode a base64 nonce as stored in a record.
    pub fn from_base64(value: &str) -> Result<Self> {
        let decoded = decode_field("nonce", value)?;
        Self::from_slice(&decoded)
    }

    /// Base64 encoding for a record.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", self.to_base64())
    }
}

/// Output of one encryption: ciphertext with tag, and the nonce used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: Nonce,
}

/// Decode a base64 record field.
pub(crate) fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>> {
    BASE64.decode(value).map_err(|e| {
        CipherError::Decode {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}

/// Encode bytes for a record field.
pub(crate) fn encode_field(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
