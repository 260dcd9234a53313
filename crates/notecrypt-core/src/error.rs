//! Error types for Notecrypt core operations.
//!
//! Every failure surfaces as a typed error. No operation substitutes an empty
//! string or placeholder plaintext when decryption fails; callers decide how to
//! present the error (and may prompt for re-authentication after a persistent
//! `Decryption` failure). None of these errors are transient, so nothing in the
//! core retries.

use thiserror::Error;

/// Result type alias for Notecrypt operations.
pub type Result<T> = std::result::Result<T, NotecryptError>;

/// Core error type for Notecrypt operations.
#[derive(Debug, Error)]
pub enum NotecryptError {
    /// Password or account identifier unusable for key derivation
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Envelope carries a format version this build does not understand
    #[error("Unsupported envelope format version: {version:#04x}")]
    UnsupportedFormat { version: u8 },

    /// Cipher refused to encrypt the payload
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong key, corrupted or tampered envelope, or undecodable envelope text
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Plaintext or attachment exceeds the configured size cap
    #[error("Payload too large: {size} bytes (limit {limit} bytes)")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Attachment MIME type is neither `image/*` nor `video/*`
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// A cipher call was routed through the key manager while no key is held
    #[error("No encryption key is active for this session")]
    NoActiveKey,

    /// Session-scoped key storage failed
    #[error("Session storage error: {0}")]
    SessionStore(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl NotecryptError {
    /// True for errors that mean "this ciphertext cannot be read with this key".
    ///
    /// Used by callers to decide whether re-authentication may help.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, NotecryptError::Decryption(_))
    }
}

impl From<std::io::Error> for NotecryptError {
    fn from(err: std::io::Error) -> Self {
        NotecryptError::SessionStore(err.to_string())
    }
}
