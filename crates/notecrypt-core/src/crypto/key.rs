//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Turns a password plus an account identifier into 256 bits of key material.
//! Derivation is deterministic: no key is ever persisted server-side, so the
//! same credentials must reproduce the same key on every client and every
//! login, or previously stored envelopes become unreadable.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::credentials::validate_credentials;
use crate::error::{NotecryptError, Result};

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2 iteration count for KDF version 1.
///
/// Targets a few hundred milliseconds on interactive hardware. Raising it
/// requires a new KDF version, since every client must derive identical bytes.
pub const KDF_V1_ITERATIONS: u32 = 600_000;

/// Versioned key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// KDF parameter set version
    pub version: u8,
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// The parameter set every client uses today.
    pub const V1: KdfParams = KdfParams {
        version: 1,
        iterations: KDF_V1_ITERATIONS,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::V1
    }
}

/// Symmetric key material derived from account credentials.
///
/// The raw bytes never leave this crate: ciphers borrow the key, and the key
/// manager is the only owner for a session. Memory is zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Rebuild a key from stored session material.
    ///
    /// Returns `None` when the material has the wrong length.
    pub(crate) fn from_slice(bytes: &[u8]) -> Option<Self> {
        let key: [u8; KEY_LENGTH] = bytes.try_into().ok()?;
        Some(Self::from_bytes(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for DerivedKey {}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Per-account salt: SHA-256 of the UTF-8 account identifier.
pub fn account_salt(account_identifier: &str) -> [u8; 32] {
    Sha256::digest(account_identifier.as_bytes()).into()
}

/// Derive the session key for an account with the current parameters.
///
/// # Errors
///
/// Returns `NotecryptError::KeyDerivation` if the password or account
/// identifier is empty (whitespace-only counts as empty).
///
/// # Examples
///
/// ```
/// use notecrypt_core::crypto::derive;
///
/// let a = derive("Tr0ub4dor&3", "alice").unwrap();
/// let b = derive("Tr0ub4dor&3", "alice").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn derive(password: &str, account_identifier: &str) -> Result<DerivedKey> {
    derive_with(password, account_identifier, KdfParams::V1)
}

/// Derive a key with explicit parameters.
///
/// Inputs are used byte-for-byte; no trimming or Unicode normalization is
/// applied, so clients must submit identical strings.
pub fn derive_with(
    password: &str,
    account_identifier: &str,
    params: KdfParams,
) -> Result<DerivedKey> {
    validate_credentials(password, account_identifier)?;
    if params.iterations == 0 {
        return Err(NotecryptError::KeyDerivation(
            "Iteration count must be positive".to_string(),
        ));
    }

    let salt = account_salt(account_identifier);
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &salt,
        params.iterations,
        &mut key_bytes,
    );

    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        version: 1,
        iterations: 1_000,
    };

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive("Tr0ub4dor&3", "alice").unwrap();
        let key2 = derive("Tr0ub4dor&3", "alice").unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_v1_known_answer() {
        // Every client must reproduce these bytes for the same credentials.
        let key = derive("Tr0ub4dor&3", "alice").unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "ed7af997156fcfe96353df80af6f216fcd5c2bebcfa80df0e0a76f5766ed6c9a"
        );
    }

    #[test]
    fn test_different_account_different_key() {
        let key1 = derive_with("same-password", "alice", FAST).unwrap();
        let key2 = derive_with("same-password", "bob", FAST).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_different_password_different_key() {
        let key1 = derive_with("password-one", "alice", FAST).unwrap();
        let key2 = derive_with("password-two", "alice", FAST).unwrap();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_iteration_count_changes_key() {
        let fast = derive_with("password", "alice", FAST).unwrap();
        let v1 = derive("password", "alice").unwrap();

        assert_ne!(fast, v1);
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_with("", "alice", FAST);
        assert!(matches!(result, Err(NotecryptError::KeyDerivation(_))));

        let result = derive_with("  \t", "alice", FAST);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Password cannot be empty"));
    }

    #[test]
    fn test_empty_account_rejected() {
        let result = derive_with("password", "", FAST);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Account identifier cannot be empty"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let params = KdfParams {
            version: 1,
            iterations: 0,
        };
        assert!(matches!(
            derive_with("password", "alice", params),
            Err(NotecryptError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_account_salt_is_sha256() {
        // SHA-256("alice")
        assert_eq!(
            hex::encode(account_salt("alice")),
            "2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90"
        );
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(DerivedKey::from_slice(&[0u8; KEY_LENGTH]).is_some());
        assert!(DerivedKey::from_slice(&[0u8; 16]).is_none());
        assert!(DerivedKey::from_slice(&[]).is_none());
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_with("test-password", "alice", FAST).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
