//! # Notecrypt Core
//!
//! Client-side encryption core for zero-knowledge note storage: the backend
//! only ever receives opaque base64 envelopes and cannot read titles, bodies,
//! or attachments without the key held by the client.
//!
//! ## Architecture
//!
//! - **crypto**: password + account identifier → 256-bit key (PBKDF2-HMAC-SHA256)
//! - **envelope**: versioned AES-256-GCM envelopes (`seal` / `open`)
//! - **session**: the key lifecycle manager and session-scoped key storage
//! - **attachment**: image/video payloads through the envelope cipher
//! - **note**: per-field note sealing and JSON object helpers
//!
//! Every client must use the same KDF parameters and envelope layout so a note
//! sealed on one client opens on another.

pub mod attachment;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod note;
pub mod session;

pub use attachment::{AttachmentCodec, AttachmentKind, EncryptedAttachment};
pub use crypto::{derive, DerivedKey};
pub use envelope::{open, seal};
pub use error::{NotecryptError, Result};
pub use session::{KeyManager, KeyState, MemorySessionStore, SessionRecord, SessionStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
