//! Session-key wrapping (key encapsulation)
//!
//! The asymmetric transform is confined to this module: it wraps and
//! unwraps the fixed-length session key, nothing else. The
//! [`KeyEncapsulation`] trait is the seam that lets the envelope
//! orchestration be exercised with deterministic stand-ins in tests.
//!
//! The production implementation is RSA-OAEP with SHA-256.

use crate::error::{EnvelopeError, Result};
use crate::session::SESSION_KEY_LEN;
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// OAEP overhead for SHA-256 in bytes: 2 * hash length + 2
const OAEP_OVERHEAD: usize = 66;

/// Trait for key encapsulation mechanisms
///
/// Wraps a short symmetric key under a public key and unwraps it with the
/// matching private key. Implementations must fail loudly on a
/// non-matching private key rather than return garbage.
pub trait KeyEncapsulation {
    /// Public key type
    type PublicKey: ?Sized;

    /// Private key type
    type PrivateKey: ?Sized;

    /// Wrapped key type (ciphertext)
    type WrappedKey;

    /// Wrap a symmetric key with a public key
    fn wrap(&self, key: &[u8], public_key: &Self::PublicKey) -> Result<Self::WrappedKey>;

    /// Unwrap a symmetric key with a private key
    fn unwrap(
        &self,
        wrapped: &Self::WrappedKey,
        private_key: &Self::PrivateKey,
    ) -> Result<Vec<u8>>;
}

/// RSA-OAEP (SHA-256) key encapsulation over PEM-encoded public keys
///
/// Wrapped keys are raw ciphertext bytes; any text-safe encoding is the
/// wire layer's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaOaepKem;

impl KeyEncapsulation for RsaOaepKem {
    type PublicKey = str; // SPKI PEM
    type PrivateKey = RsaPrivateKey;
    type WrappedKey = Vec<u8>;

    fn wrap(&self, key: &[u8], public_key_pem: &str) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(EnvelopeError::InvalidArgument("key material is empty"));
        }

        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem).map_err(|e| {
            EnvelopeError::InvalidKey(format!("failed to parse RSA public key: {}", e))
        })?;

        // OAEP capacity is the modulus length minus the padding overhead.
        let capacity = public_key.size().saturating_sub(OAEP_OVERHEAD);
        if capacity < SESSION_KEY_LEN {
            return Err(EnvelopeError::InvalidKey(format!(
                "RSA modulus of {} bytes leaves {} bytes of OAEP capacity, below the {}-byte session key",
                public_key.size(),
                capacity,
                SESSION_KEY_LEN
            )));
        }
        if key.len() > capacity {
            return Err(EnvelopeError::InvalidArgument(
                "key material exceeds OAEP capacity",
            ));
        }

        let padding = Oaep::new::<Sha256>();
        public_key
            .encrypt(&mut OsRng, padding, key)
            .map_err(|e| EnvelopeError::InvalidKey(format!("RSA-OAEP wrap failed: {}", e)))
    }

    fn unwrap(&self, wrapped: &Vec<u8>, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
        // RSA ciphertext length always equals the modulus length of the
        // key that produced it; anything else cannot have come from `wrap`.
        if wrapped.len() != private_key.size() {
            return Err(EnvelopeError::DecryptionFailed);
        }

        let padding = Oaep::new::<Sha256>();
        let material = private_key
            .decrypt(padding, wrapped)
            .map_err(|_| EnvelopeError::DecryptionFailed)?;

        // A valid wrap always carries exactly one session key.
        if material.len() != SESSION_KEY_LEN {
            return Err(EnvelopeError::DecryptionFailed);
        }

        Ok(material)
    }
}
