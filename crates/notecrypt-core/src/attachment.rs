//! Attachment codec for images and video.
//!
//! Binary payloads are base64-encoded and the resulting text is sealed like any
//! other plaintext, so attachments share the note envelope format. The size
//! cap is enforced here, before any encoding or encryption, independent of
//! whatever transport limit the backend applies.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::DerivedKey;
use crate::envelope::{self, MAX_PLAINTEXT_BYTES};
use crate::error::{NotecryptError, Result};

/// Default per-file limit (5 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Largest raw payload whose base64 form still fits in one envelope.
pub const MAX_ATTACHMENT_BYTES: usize = MAX_PLAINTEXT_BYTES / 4 * 3;

/// Media family, derived from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
}

impl AttachmentKind {
    /// Classify a MIME type.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedMedia` for anything other than `image/*` or `video/*`.
    pub fn from_mime(mime_type: &str) -> Result<Self> {
        let lower = mime_type.trim().to_ascii_lowercase();
        if lower.starts_with("image/") && lower.len() > "image/".len() {
            Ok(AttachmentKind::Image)
        } else if lower.starts_with("video/") && lower.len() > "video/".len() {
            Ok(AttachmentKind::Video)
        } else {
            Err(NotecryptError::UnsupportedMedia(mime_type.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Video => "video",
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sealed attachment as persisted by the backend.
///
/// Only `envelope` is secret; file name and MIME type travel in the clear so
/// the backend can list and serve attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedAttachment {
    pub envelope: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

/// Encrypts and decrypts attachments under a size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentCodec {
    max_bytes: usize,
}

impl Default for AttachmentCodec {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

impl AttachmentCodec {
    /// Create a codec with a custom cap, clamped to [`MAX_ATTACHMENT_BYTES`].
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes: max_bytes.min(MAX_ATTACHMENT_BYTES),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Seal a binary payload.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMedia` if `mime_type` is not `image/*` or `video/*`
    /// - `PayloadTooLarge` if `bytes` exceeds the codec's cap
    pub fn encrypt_attachment(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
        key: &DerivedKey,
    ) -> Result<EncryptedAttachment> {
        let kind = AttachmentKind::from_mime(mime_type)?;
        if bytes.len() > self.max_bytes {
            return Err(NotecryptError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        let encoded = STANDARD.encode(bytes);
        let envelope = envelope::seal(&encoded, key)?;
        tracing::debug!(
            kind = kind.as_str(),
            size = bytes.len(),
            "attachment sealed"
        );

        Ok(EncryptedAttachment {
            envelope,
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            kind,
        })
    }

    /// Recover the original bytes of a sealed attachment.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMedia` if the record's MIME type is unsupported or
    ///   disagrees with its recorded kind
    /// - `Decryption` / `UnsupportedFormat` from the envelope, or if the
    ///   decrypted text is not base64
    pub fn decrypt_attachment(
        &self,
        attachment: &EncryptedAttachment,
        key: &DerivedKey,
    ) -> Result<Vec<u8>> {
        let kind = AttachmentKind::from_mime(&attachment.mime_type)?;
        if kind != attachment.kind {
            return Err(NotecryptError::UnsupportedMedia(format!(
                "{} recorded as {}",
                attachment.mime_type, attachment.kind
            )));
        }

        let encoded = envelope::open(&attachment.envelope, key)?;
        STANDARD.decode(encoded.as_bytes()).map_err(|_| {
            NotecryptError::Decryption("attachment payload is not valid base64".to_string())
        })
    }
}

/// Render bytes as a `data:` URL for direct display.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
