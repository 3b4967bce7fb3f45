//! Authenticated payload sealing
//!
//! AES-256-GCM under a session key. The sealed layout is
//! `nonce || ciphertext || tag` with a fresh random 96-bit nonce per
//! call. The caller's associated data (the wrapped session key) is bound
//! into the tag, so ciphertext and wrapped key cannot be spliced apart
//! without detection.

use crate::error::{EnvelopeError, Result};
use crate::session::SessionKey;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

const GCM_NONCE_LEN: usize = 12;
const GCM_TAG_LEN: usize = 16;

/// Seal a plaintext under a session key, binding `aad` into the tag
pub fn seal(plaintext: &[u8], key: &SessionKey, aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|_| EnvelopeError::InvalidKey("session key has wrong length".to_string()))?;

    let mut nonce = [0u8; GCM_NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| EnvelopeError::RandomSourceUnavailable(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| EnvelopeError::InvalidArgument("plaintext too large to seal"))?;

    let mut sealed = Vec::with_capacity(GCM_NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed payload, verifying the tag over both ciphertext and `aad`
///
/// Fails with [`EnvelopeError::AuthenticationFailed`] on any mismatch;
/// never returns partial plaintext.
pub fn open(sealed: &[u8], key: &SessionKey, aad: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < GCM_NONCE_LEN + GCM_TAG_LEN {
        return Err(EnvelopeError::InvalidArgument("sealed payload too short"));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|_| EnvelopeError::InvalidKey("session key has wrong length".to_string()))?;

    let (nonce, ciphertext) = sealed.split_at(GCM_NONCE_LEN);
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| EnvelopeError::AuthenticationFailed)
}
