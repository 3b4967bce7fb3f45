//! Unified error type for the keyvelope public API
//!
//! Every fallible operation in this crate reports through [`EnvelopeError`].
//! The variants deliberately carry no cryptographic detail on the failure
//! paths an attacker can influence: an unwrap or tag-verification failure
//! says only that it failed.

use thiserror::Error;

/// Unified error type for all envelope operations
///
/// # Error Categories
///
/// - **InvalidArgument**: caller supplied empty or oversize input; detected
///   before any cryptographic work is performed
/// - **InvalidKey**: a key blob is malformed or the wrong size for the
///   asymmetric transform
/// - **DecryptionFailed**: the wrapped session key could not be unwrapped
///   (wrong private key or corrupted bytes)
/// - **AuthenticationFailed**: AEAD tag verification failed (wrong session
///   key, tampered ciphertext, or tampered wrapped key)
/// - **RandomSourceUnavailable**: the OS entropy source failed; the
///   operation is aborted rather than falling back to weaker randomness
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Empty or oversize caller input, rejected before any crypto work
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Malformed or unsupported key material
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Asymmetric unwrap of the session key failed
    #[error("session key unwrap failed")]
    DecryptionFailed,

    /// AEAD integrity verification failed
    #[error("payload authentication failed")]
    AuthenticationFailed,

    /// OS entropy source could not be used
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

impl EnvelopeError {
    /// Returns true if the error indicates a cryptographic failure
    /// (wrong key, tampered data) rather than a malformed request.
    pub fn is_crypto_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed | Self::AuthenticationFailed)
    }

    /// Returns true if the error was caused by caller input and no
    /// cryptographic work was performed.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidKey(_))
    }
}

/// A specialized `Result` type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
