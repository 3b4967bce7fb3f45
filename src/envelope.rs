//! Envelope orchestration
//!
//! Ties the pieces together into the two-party exchange: a fresh session
//! key per message, wrapped under the recipient's public key, with the
//! plaintext sealed under that session key and the wrapped key bound in
//! as associated data.
//!
//! Both operations are pure `&self` calls returning explicit result
//! records; all per-operation state is local to the call, so one
//! [`Envelope`] can be shared across threads freely.

use crate::error::{EnvelopeError, Result};
use crate::kem::{KeyEncapsulation, RsaOaepKem};
use crate::keypair::EnvelopeKeypair;
use crate::payload;
use crate::session::SessionKey;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

/// The output of one encrypt operation
///
/// The wrapped key is not recoverable from the ciphertext, and the
/// ciphertext cannot be opened without it; the two must always travel
/// together. [`SealedMessage::to_bytes`] and the serde representation
/// (both fields as base64 strings) keep them bound on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedMessage {
    /// Nonce-prefixed AEAD output: `nonce || ciphertext || tag`
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    /// Session key encrypted under the recipient's public key
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
}

impl SealedMessage {
    /// Encode as length-prefixed bytes: u32-BE wrapped-key length, then
    /// the wrapped key, then the ciphertext.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(4 + self.wrapped_key.len() + self.ciphertext.len());
        out.extend_from_slice(&(self.wrapped_key.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.wrapped_key);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Decode the length-prefixed form produced by [`SealedMessage::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(EnvelopeError::InvalidArgument("sealed message too short"));
        }
        let (prefix, rest) = bytes.split_at(4);
        let wrapped_len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if rest.len() < wrapped_len {
            return Err(EnvelopeError::InvalidArgument(
                "sealed message truncated after length prefix",
            ));
        }
        let (wrapped_key, ciphertext) = rest.split_at(wrapped_len);

        Ok(Self {
            ciphertext: ciphertext.to_vec(),
            wrapped_key: wrapped_key.to_vec(),
        })
    }
}

/// One party's identity in the envelope exchange
///
/// Owns an RSA key pair; the public half is shared out-of-band, the
/// private half never leaves the value. Holds no per-operation state.
///
/// # Examples
///
/// ```
/// use keyvelope::Envelope;
///
/// # fn main() -> Result<(), keyvelope::EnvelopeError> {
/// let alice = Envelope::generate()?;
/// let bob = Envelope::generate()?;
///
/// let sealed = alice.encrypt(b"hello", bob.public_key_pem())?;
/// let plaintext = bob.decrypt(&sealed)?;
/// assert_eq!(plaintext, b"hello");
/// # Ok(())
/// # }
/// ```
pub struct Envelope {
    keypair: EnvelopeKeypair,
}

impl Envelope {
    /// Create an envelope with a freshly generated identity key pair
    pub fn generate() -> Result<Self> {
        let keypair = EnvelopeKeypair::generate()?;
        debug!("generated new envelope identity");
        Ok(Self { keypair })
    }

    /// Create an envelope around an existing key pair
    pub fn from_keypair(keypair: EnvelopeKeypair) -> Self {
        Self { keypair }
    }

    /// Get this envelope's public key in PEM format
    pub fn public_key_pem(&self) -> &str {
        self.keypair.public_key_pem()
    }

    /// Get the underlying key pair
    pub fn keypair(&self) -> &EnvelopeKeypair {
        &self.keypair
    }

    /// Encrypt a plaintext for the holder of `recipient_public_key_pem`
    ///
    /// Generates a fresh session key, wraps it under the recipient key,
    /// and seals the plaintext with the wrapped key as associated data.
    /// Every failure is terminal for the call; nothing is retried and no
    /// partial result escapes.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        recipient_public_key_pem: &str,
    ) -> Result<SealedMessage> {
        if recipient_public_key_pem.trim().is_empty() {
            return Err(EnvelopeError::InvalidArgument(
                "recipient public key is empty",
            ));
        }
        if plaintext.is_empty() {
            return Err(EnvelopeError::InvalidArgument("plaintext is empty"));
        }

        let session_key = SessionKey::generate()?;
        let wrapped_key = RsaOaepKem.wrap(session_key.as_slice(), recipient_public_key_pem)?;
        let ciphertext = payload::seal(plaintext, &session_key, &wrapped_key)?;

        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "sealed payload under fresh session key"
        );

        Ok(SealedMessage {
            ciphertext,
            wrapped_key,
        })
    }

    /// Decrypt a sealed message addressed to this envelope's key pair
    ///
    /// Unwraps the session key with the private half, then opens the
    /// ciphertext with the wrapped key as associated data. A wrapped key
    /// produced for any other public key fails with
    /// [`EnvelopeError::DecryptionFailed`].
    pub fn decrypt(&self, sealed: &SealedMessage) -> Result<Vec<u8>> {
        if sealed.wrapped_key.is_empty() {
            return Err(EnvelopeError::InvalidArgument(
                "wrapped session key is empty",
            ));
        }
        if sealed.ciphertext.is_empty() {
            return Err(EnvelopeError::InvalidArgument("ciphertext is empty"));
        }

        let material = Zeroizing::new(
            RsaOaepKem.unwrap(&sealed.wrapped_key, self.keypair.private_key())?,
        );
        let session_key = SessionKey::from_bytes(&material)?;
        let plaintext = payload::open(&sealed.ciphertext, &session_key, &sealed.wrapped_key)?;

        debug!(plaintext_len = plaintext.len(), "opened sealed payload");
        Ok(plaintext)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_rejects_empty_arguments() {
        let envelope = Envelope::generate().unwrap();
        let recipient_pem = envelope.public_key_pem().to_string();

        let result = envelope.encrypt(b"", &recipient_pem);
        assert!(matches!(result, Err(EnvelopeError::InvalidArgument(_))));

        let result = envelope.encrypt(b"data", "");
        assert!(matches!(result, Err(EnvelopeError::InvalidArgument(_))));

        let result = envelope.encrypt(b"data", "   \n");
        assert!(matches!(result, Err(EnvelopeError::InvalidArgument(_))));
    }

    #[test]
    fn test_decrypt_rejects_empty_fields() {
        let envelope = Envelope::generate().unwrap();

        let missing_key = SealedMessage {
            ciphertext: vec![1, 2, 3],
            wrapped_key: vec![],
        };
        assert!(matches!(
            envelope.decrypt(&missing_key),
            Err(EnvelopeError::InvalidArgument(_))
        ));

        let missing_ciphertext = SealedMessage {
            ciphertext: vec![],
            wrapped_key: vec![1, 2, 3],
        };
        assert!(matches!(
            envelope.decrypt(&missing_ciphertext),
            Err(EnvelopeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sealed_message_wire_roundtrip() {
        let message = SealedMessage {
            ciphertext: vec![9, 8, 7, 6, 5],
            wrapped_key: vec![1, 2, 3],
        };

        let bytes = message.to_bytes();
        let restored = SealedMessage::from_bytes(&bytes).unwrap();
        assert_eq!(message, restored);
    }

    #[test]
    fn test_sealed_message_rejects_truncated_wire_form() {
        assert!(matches!(
            SealedMessage::from_bytes(&[0, 0]),
            Err(EnvelopeError::InvalidArgument(_))
        ));

        // Length prefix claims more wrapped-key bytes than are present.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u32.to_be_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            SealedMessage::from_bytes(&bytes),
            Err(EnvelopeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sealed_message_json_roundtrip() {
        let message = SealedMessage {
            ciphertext: vec![0xDE, 0xAD, 0xBE, 0xEF],
            wrapped_key: vec![0x01, 0x02],
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains("ciphertext"));
        assert!(json.contains("wrapped_key"));

        let restored: SealedMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(message, restored);
    }

    #[test]
    fn test_sealed_message_json_rejects_bad_base64() {
        let json = r#"{"ciphertext": "!!!not-base64!!!", "wrapped_key": "AQI="}"#;
        let result: std::result::Result<SealedMessage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
