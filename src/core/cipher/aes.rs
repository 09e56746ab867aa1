//! AES-256-GCM backend.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce as GcmNonce};
use tracing::trace;

use super::{Cipher, Nonce, Sealed};
use crate::core::key::Key;
use crate::error::{CipherError, Result};

/// AES-256-GCM with a random 96-bit nonce per message.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcm;

impl AesGcm {
    fn cipher(key: &Key) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(key.expose())
            .map_err(|_| CipherError::EncryptionFailed("invalid key length".to_string()).into())
    }
}

impl Cipher for AesGcm {
    fn encrypt(&self, key: &Key, plaintext: &[u8]) -> Result<Sealed> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let nonce = Nonce::random();
        let ciphertext = Self::cipher(key)?
            .encrypt(GcmNonce::from_slice(nonce.as_bytes()), plaintext)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        trace!(ciphertext_len = ciphertext.len(), "encrypted");
        Ok(Sealed { ciphertext, nonce })
    }

    fn decrypt(&self, key: &Key, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting");

        let plaintext = Self::cipher(key)?
            .decrypt(GcmNonce::from_slice(nonce.as_bytes()), ciphertext)
            .map_err(|_| CipherError::Authentication)?;

        trace!(plaintext_len = plaintext.len(), "decrypted");
        Ok(plaintext)
    }

    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }
}
