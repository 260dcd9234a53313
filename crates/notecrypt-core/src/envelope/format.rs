//! Binary envelope layout.
//!
//! Version 1:
//!
//! ```text
//! +---------+--------------+---------------------------+
//! | version | nonce        | ciphertext ‖ tag          |
//! | 1 byte  | 12 bytes     | len(plaintext) + 16 bytes |
//! +---------+--------------+---------------------------+
//! ```
//!
//! AES-256-GCM with a random 96-bit nonce; the version byte is bound as
//! associated data. The whole buffer is carried as standard padded base64.
//! Offsets are fixed per version: a reader never guesses a layout, and an
//! unknown version byte is rejected before anything else is parsed.

use crate::error::{NotecryptError, Result};

/// AES-GCM nonce length used by version 1.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length used by version 1.
pub const TAG_LEN: usize = 16;

/// Length of the version header.
pub const HEADER_LEN: usize = 1;

/// Largest plaintext accepted by `seal` (10 MiB).
pub const MAX_PLAINTEXT_BYTES: usize = 10 * 1024 * 1024;

/// Envelope format versions understood by this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FormatVersion {
    /// AES-256-GCM, 12-byte nonce, 16-byte tag, version byte as AAD
    V1 = 0x01,
}

impl FormatVersion {
    /// Version written by `seal`.
    pub const CURRENT: FormatVersion = FormatVersion::V1;

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn nonce_len(self) -> usize {
        match self {
            FormatVersion::V1 => NONCE_LEN,
        }
    }

    pub fn tag_len(self) -> usize {
        match self {
            FormatVersion::V1 => TAG_LEN,
        }
    }

    /// Smallest valid decoded envelope (empty plaintext).
    pub fn min_len(self) -> usize {
        HEADER_LEN + self.nonce_len() + self.tag_len()
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = NotecryptError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(FormatVersion::V1),
            other => Err(NotecryptError::UnsupportedFormat { version: other }),
        }
    }
}

/// Borrowed view of a decoded envelope.
#[derive(Debug)]
pub struct EnvelopeParts<'a> {
    pub version: FormatVersion,
    pub nonce: &'a [u8],
    /// Ciphertext with the authentication tag appended
    pub ciphertext: &'a [u8],
}

/// Split a decoded envelope at its version-specific offsets.
///
/// # Errors
///
/// - `UnsupportedFormat` if the first byte is not a known version
/// - `Decryption` if the buffer is empty or shorter than the version's minimum
pub fn split(raw: &[u8]) -> Result<EnvelopeParts<'_>> {
    let (&first, rest) = raw
        .split_first()
        .ok_or_else(|| NotecryptError::Decryption("envelope is empty".to_string()))?;
    let version = FormatVersion::try_from(first)?;

    if raw.len() < version.min_len() {
        return Err(NotecryptError::Decryption(format!(
            "envelope truncated: {} bytes, need at least {}",
            raw.len(),
            version.min_len()
        )));
    }

    let (nonce, ciphertext) = rest.split_at(version.nonce_len());
    Ok(EnvelopeParts {
        version,
        nonce,
        ciphertext,
    })
}

/// Concatenate version ‖ nonce ‖ ciphertext.
pub fn assemble(version: FormatVersion, nonce: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + nonce.len() + ciphertext.len());
    out.push(version.as_byte());
    out.extend_from_slice(nonce);
    out.extend_from_slice(ciphertext);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_min_len() {
        assert_eq!(FormatVersion::V1.min_len(), 29);
        assert_eq!(FormatVersion::CURRENT.as_byte(), 0x01);
    }

    #[test]
    fn test_unknown_versions_rejected() {
        for byte in [0x00u8, 0x02, 0x53, 0xff] {
            assert!(matches!(
                FormatVersion::try_from(byte),
                Err(NotecryptError::UnsupportedFormat { version }) if version == byte
            ));
        }
    }

    #[test]
    fn test_split_offsets() {
        let nonce = [0xAAu8; NONCE_LEN];
        let body = [0xBBu8; TAG_LEN + 3];
        let raw = assemble(FormatVersion::V1, &nonce, &body);

        let parts = split(&raw).unwrap();
        assert_eq!(parts.version, FormatVersion::V1);
        assert_eq!(parts.nonce, &nonce);
        assert_eq!(parts.ciphertext, &body);
    }

    #[test]
    fn test_split_empty_is_decryption_error() {
        assert!(matches!(split(&[]), Err(NotecryptError::Decryption(_))));
    }

    #[test]
    fn test_split_truncated_is_decryption_error() {
        let raw = [0x01u8; 28];
        let err = split(&raw).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_unknown_version_reported_before_length() {
        // A short buffer with a bad version byte is a format error, not truncation.
        assert!(matches!(
            split(&[0x09, 0x00]),
            Err(NotecryptError::UnsupportedFormat { version: 0x09 })
        ));
    }
}
