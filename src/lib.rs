//! Hybrid (envelope) encryption for two-party exchange over untrusted channels
//!
//! Each message is sealed under a fresh AES-256-GCM session key, and that
//! session key is wrapped under the recipient's RSA public key. Only the
//! holder of the matching private key can unwrap the session key and open
//! the payload; the wrapped key itself is bound into the AEAD tag as
//! associated data, so ciphertext and wrapped key cannot be spliced apart
//! without detection.
//!
//! The scheme works as follows:
//!
//! 1. Generate a 32-byte session key from OS randomness conditioned
//!    through SHA-256.
//! 2. Wrap the session key under the recipient's public key with
//!    RSA-OAEP (SHA-256).
//! 3. Seal the plaintext under the session key with AES-256-GCM, binding
//!    the wrapped key as associated data.
//! 4. Transmit ciphertext and wrapped key together; the receiver unwraps
//!    with its private key and opens the payload.
//!
//! Public and private keys travel as opaque PEM strings; how they are
//! exchanged and stored is the caller's concern. There is no key
//! distribution, trust, or persistence layer here.
//!
//! # Example
//!
//! ```
//! use keyvelope::Envelope;
//!
//! # fn main() -> Result<(), keyvelope::EnvelopeError> {
//! let alice = Envelope::generate()?;
//! let bob = Envelope::generate()?;
//!
//! // Alice seals a message for Bob using his public key.
//! let sealed = alice.encrypt(b"meet at noon", bob.public_key_pem())?;
//!
//! // Bob recovers it with his private key.
//! assert_eq!(bob.decrypt(&sealed)?, b"meet at noon");
//!
//! // Alice cannot open a message addressed to Bob.
//! assert!(alice.decrypt(&sealed).is_err());
//! # Ok(())
//! # }
//! ```

mod envelope;
mod error;
mod kem;
mod keypair;
mod payload;
mod session;

pub use envelope::{Envelope, SealedMessage};
pub use error::{EnvelopeError, Result};
pub use kem::{KeyEncapsulation, RsaOaepKem};
pub use keypair::{EnvelopeKeypair, RSA_KEY_BITS};
pub use payload::{open, seal};
pub use session::{SessionKey, SESSION_KEY_LEN};
