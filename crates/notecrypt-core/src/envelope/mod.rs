//! Envelope cipher: plaintext in, self-describing base64 string out.
//!
//! Every `seal` draws a fresh random nonce, so sealing the same plaintext twice
//! under the same key yields different envelopes, and concurrent calls need no
//! coordination. `open` reads the version byte first and refuses versions it
//! does not know instead of guessing a layout. Any authentication failure
//! (wrong key, corruption, tampering) is an error, never empty output.

pub mod format;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::DerivedKey;
use crate::error::{NotecryptError, Result};

pub use format::{FormatVersion, MAX_PLAINTEXT_BYTES, NONCE_LEN, TAG_LEN};

/// Encrypt UTF-8 text into an envelope string.
///
/// # Examples
///
/// ```
/// use notecrypt_core::crypto::derive;
/// use notecrypt_core::envelope::{open, seal};
///
/// let key = derive("Tr0ub4dor&3", "alice").unwrap();
/// let envelope = seal("Buy milk", &key).unwrap();
/// assert_eq!(open(&envelope, &key).unwrap(), "Buy milk");
/// ```
pub fn seal(plaintext: &str, key: &DerivedKey) -> Result<String> {
    seal_bytes(plaintext.as_bytes(), key)
}

/// Encrypt raw bytes into an envelope string.
///
/// # Errors
///
/// Returns `PayloadTooLarge` if `plaintext` exceeds [`MAX_PLAINTEXT_BYTES`].
pub fn seal_bytes(plaintext: &[u8], key: &DerivedKey) -> Result<String> {
    if plaintext.len() > MAX_PLAINTEXT_BYTES {
        return Err(NotecryptError::PayloadTooLarge {
            size: plaintext.len(),
            limit: MAX_PLAINTEXT_BYTES,
        });
    }

    let version = FormatVersion::CURRENT;
    let aad = [version.as_byte()];
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher_for(key)
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| NotecryptError::Encryption("AES-GCM seal failed".to_string()))?;

    let raw = format::assemble(version, nonce.as_slice(), &ciphertext);
    Ok(STANDARD.encode(raw))
}

/// Decrypt an envelope string into UTF-8 text.
///
/// # Errors
///
/// - `UnsupportedFormat` for an unknown version byte
/// - `Decryption` for undecodable input, wrong key, tampering, or a
///   plaintext that is not valid UTF-8
pub fn open(envelope: &str, key: &DerivedKey) -> Result<String> {
    let bytes = open_bytes(envelope, key)?;
    String::from_utf8(bytes)
        .map_err(|_| NotecryptError::Decryption("plaintext is not valid UTF-8".to_string()))
}

/// Decrypt an envelope string into raw bytes.
pub fn open_bytes(envelope: &str, key: &DerivedKey) -> Result<Vec<u8>> {
    let raw = STANDARD
        .decode(envelope.as_bytes())
        .map_err(|e| NotecryptError::Decryption(format!("envelope is not valid base64: {}", e)))?;
    let parts = format::split(&raw)?;

    match parts.version {
        FormatVersion::V1 => {
            let aad = [parts.version.as_byte()];
            cipher_for(key)
                .decrypt(
                    Nonce::from_slice(parts.nonce),
                    Payload {
                        msg: parts.ciphertext,
                        aad: &aad,
                    },
                )
                .map_err(|_| {
                    NotecryptError::Decryption(
                        "authentication failed (wrong key or corrupted envelope)".to_string(),
                    )
                })
        }
    }
}

/// Report the format version of an envelope without decrypting it.
pub fn version_of(envelope: &str) -> Result<FormatVersion> {
    let raw = STANDARD
        .decode(envelope.as_bytes())
        .map_err(|e| NotecryptError::Decryption(format!("envelope is not valid base64: {}", e)))?;
    Ok(format::split(&raw)?.version)
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LENGTH;

    fn key(fill: u8) -> DerivedKey {
        DerivedKey::from_bytes([fill; KEY_LENGTH])
    }

    fn decode(envelope: &str) -> Vec<u8> {
        STANDARD.decode(envelope).unwrap()
    }

    #[test]
    fn test_seal_open_round_trip() {
        let k = key(7);
        let envelope = seal("Buy milk", &k).unwrap();
        assert_eq!(open(&envelope, &k).unwrap(), "Buy milk");
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let k = key(7);
        let envelope = seal("", &k).unwrap();
        assert_eq!(decode(&envelope).len(), FormatVersion::V1.min_len());
        assert_eq!(open(&envelope, &k).unwrap(), "");
    }

    #[test]
    fn test_unicode_round_trips() {
        let k = key(7);
        let text = "Ciao, questo è un test di crittografia! 🔐";
        let envelope = seal(text, &k).unwrap();
        assert_eq!(open(&envelope, &k).unwrap(), text);
    }

    #[test]
    fn test_v1_layout() {
        let k = key(7);
        let envelope = seal("hello", &k).unwrap();
        let raw = decode(&envelope);

        assert_eq!(raw[0], 0x01);
        assert_eq!(raw.len(), 1 + NONCE_LEN + 5 + TAG_LEN);
        // Standard alphabet with padding
        assert_eq!(envelope.len() % 4, 0);
        assert_eq!(version_of(&envelope).unwrap(), FormatVersion::V1);
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let k = key(7);
        let a = seal("same plaintext", &k).unwrap();
        let b = seal("same plaintext", &k).unwrap();

        assert_ne!(a, b);
        assert_ne!(decode(&a)[1..1 + NONCE_LEN], decode(&b)[1..1 + NONCE_LEN]);
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope = seal("secret", &key(1)).unwrap();
        let result = open(&envelope, &key(2));
        assert!(matches!(result, Err(NotecryptError::Decryption(_))));
    }

    #[test]
    fn test_tampering_any_region_fails() {
        let k = key(7);
        let envelope = seal("tamper target", &k).unwrap();
        let raw = decode(&envelope);

        // Skip the version byte: flipping it is a format error, covered below.
        for index in 1..raw.len() {
            let mut corrupted = raw.clone();
            corrupted[index] ^= 0x01;
            let result = open(&STANDARD.encode(&corrupted), &k);
            assert!(
                matches!(result, Err(NotecryptError::Decryption(_))),
                "byte {} flip was not detected",
                index
            );
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let k = key(7);
        let mut raw = decode(&seal("hello", &k).unwrap());
        raw[0] = 0x02;
        let result = open(&STANDARD.encode(&raw), &k);
        assert!(matches!(
            result,
            Err(NotecryptError::UnsupportedFormat { version: 0x02 })
        ));
    }

    #[test]
    fn test_truncated_envelope_fails() {
        let k = key(7);
        let raw = decode(&seal("hello", &k).unwrap());
        let truncated = STANDARD.encode(&raw[..FormatVersion::V1.min_len() - 1]);
        assert!(matches!(
            open(&truncated, &k),
            Err(NotecryptError::Decryption(_))
        ));
    }

    #[test]
    fn test_invalid_base64_fails() {
        let k = key(7);
        assert!(matches!(
            open("not base64 at all!", &k),
            Err(NotecryptError::Decryption(_))
        ));
        assert!(matches!(open("", &k), Err(NotecryptError::Decryption(_))));
    }

    #[test]
    fn test_legacy_prefixed_format_rejected() {
        // The old "ENC:" text-prefix convention is not an envelope.
        let k = key(7);
        assert!(open("ENC:U2FsdGVkX1+abc=", &k).is_err());
    }

    #[test]
    fn test_non_utf8_plaintext_fails_text_open() {
        let k = key(7);
        let envelope = seal_bytes(&[0xff, 0xfe, 0x00], &k).unwrap();
        assert_eq!(open_bytes(&envelope, &k).unwrap(), vec![0xff, 0xfe, 0x00]);
        assert!(open(&envelope, &k)
            .unwrap_err()
            .to_string()
            .contains("UTF-8"));
    }

    #[test]
    fn test_payload_cap_enforced() {
        let k = key(7);
        let at_cap = vec![0x42u8; MAX_PLAINTEXT_BYTES];
        let envelope = seal_bytes(&at_cap, &k).unwrap();
        assert_eq!(open_bytes(&envelope, &k).unwrap().len(), MAX_PLAINTEXT_BYTES);

        let over_cap = vec![0x42u8; MAX_PLAINTEXT_BYTES + 1];
        assert!(matches!(
            seal_bytes(&over_cap, &k),
            Err(NotecryptError::PayloadTooLarge { size, limit })
                if size == MAX_PLAINTEXT_BYTES + 1 && limit == MAX_PLAINTEXT_BYTES
        ));
    }
}
