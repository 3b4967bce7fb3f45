//! Session key generation
//!
//! A session key protects exactly one message: generated fresh on every
//! encrypt, reconstructed once on the matching decrypt, zeroized on drop.

use crate::error::{EnvelopeError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Session key length in bytes (AES-256)
pub const SESSION_KEY_LEN: usize = 32;

/// Entropy drawn from the OS per generated session key
const RANDOM_DRAW_LEN: usize = 256;

/// A 32-byte symmetric session key that zeroizes on drop
///
/// Seals at most one plaintext. Deliberately implements neither `Debug`
/// nor `Display`, so key material cannot end up in logs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_LEN]);

impl SessionKey {
    /// Generate a fresh session key
    ///
    /// Draws 256 bytes from the OS random source and conditions them
    /// through SHA-256. The hash step normalizes the output to the AEAD
    /// key length and destroys any residual structure in the raw draw.
    /// Entropy failure aborts the operation; there is no fallback source.
    pub fn generate() -> Result<Self> {
        let mut draw = Zeroizing::new([0u8; RANDOM_DRAW_LEN]);
        OsRng
            .try_fill_bytes(draw.as_mut_slice())
            .map_err(|e| EnvelopeError::RandomSourceUnavailable(e.to_string()))?;

        let digest = Sha256::digest(draw.as_slice());
        let mut key = [0u8; SESSION_KEY_LEN];
        key.copy_from_slice(&digest);
        Ok(SessionKey(key))
    }

    /// Reconstruct a session key from unwrapped material (receive path)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SESSION_KEY_LEN {
            return Err(EnvelopeError::InvalidKey(format!(
                "session key must be {} bytes, got {}",
                SESSION_KEY_LEN,
                bytes.len()
            )));
        }
        let mut key = [0u8; SESSION_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(SessionKey(key))
    }

    /// Get a reference to the key bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_full_length_key() {
        let key = SessionKey::generate().unwrap();
        assert_eq!(key.as_slice().len(), SESSION_KEY_LEN);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = SessionKey::generate().unwrap();
        let b = SessionKey::generate().unwrap();
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let original = SessionKey::generate().unwrap();
        let restored = SessionKey::from_bytes(original.as_slice()).unwrap();
        assert_eq!(original.as_slice(), restored.as_slice());
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert!(matches!(
            SessionKey::from_bytes(&[0u8; 16]),
            Err(EnvelopeError::InvalidKey(_))
        ));
        assert!(matches!(
            SessionKey::from_bytes(&[]),
            Err(EnvelopeError::InvalidKey(_))
        ));
    }
}
