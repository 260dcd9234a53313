//! Key derivation for Notecrypt.
//!
//! ## Security Model
//!
//! - PBKDF2-HMAC-SHA256, salted with SHA-256 of the account identifier
//! - Fixed, versioned iteration count shared by every client
//! - Key material zeroized from memory on drop
//! - Passwords are consumed once and never stored
//!
//! ## Threat Model
//!
//! We defend against:
//! - A backend (or its database dump) reading note contents
//! - Offline brute-force attacks slowed by the iteration count
//!
//! We do NOT defend against:
//! - Compromised client device / keylogger
//! - Access to an unlocked session's memory or session storage

pub mod credentials;
pub mod key;

pub use credentials::{validate_credentials, AccountSecret};
pub use key::{
    account_salt, derive, derive_with, DerivedKey, KdfParams, KDF_V1_ITERATIONS, KEY_LENGTH,
};
