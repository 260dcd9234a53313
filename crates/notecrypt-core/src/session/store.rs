//! Session-scoped key storage.
//!
//! A session store keeps the active key for the lifetime of a login session
//! (not persistently), so a reloaded client can restore it without prompting
//! for the password again. Implementations decide where "session scope" lives:
//! process memory, a per-login runtime directory, a browser's session storage.

use zeroize::Zeroizing;

use crate::crypto::DerivedKey;
use crate::error::Result;

/// What a session store persists: the account and its key material.
#[derive(Clone)]
pub struct SessionRecord {
    account_identifier: String,
    key_material: Zeroizing<Vec<u8>>,
}

impl SessionRecord {
    /// Build a record from previously stored parts.
    ///
    /// The key material is validated when the manager restores it, not here.
    pub fn new(account_identifier: impl Into<String>, key_material: Vec<u8>) -> Self {
        Self {
            account_identifier: account_identifier.into(),
            key_material: Zeroizing::new(key_material),
        }
    }

    pub(crate) fn from_key(account_identifier: &str, key: &DerivedKey) -> Self {
        Self::new(account_identifier, key.as_bytes().to_vec())
    }

    pub fn account_identifier(&self) -> &str {
        &self.account_identifier
    }

    /// Raw key bytes, for stores that must serialize them.
    ///
    /// # Security
    ///
    /// Never log this value or write it anywhere outlasting the session.
    pub fn key_material(&self) -> &[u8] {
        &self.key_material
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("account_identifier", &self.account_identifier)
            .field("key_material", &"[REDACTED]")
            .finish()
    }
}

/// Backing storage for the key manager.
///
/// Implementations must:
/// - Keep records no longer than the login session
/// - Treat `remove` of an absent record as success
/// - Return `NotecryptError::SessionStore` on I/O failure
pub trait SessionStore: Send {
    /// Load the stored record, if any.
    fn load(&self) -> Result<Option<SessionRecord>>;

    /// Replace the stored record.
    fn save(&mut self, record: &SessionRecord) -> Result<()>;

    /// Delete the stored record.
    fn remove(&mut self) -> Result<()>;
}

/// Session store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Option<SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        self.record = Some(record.clone());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.record = None;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn load(&self) -> Result<Option<SessionRecord>> {
        (**self).load()
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        (**self).save(record)
    }

    fn remove(&mut self) -> Result<()> {
        (**self).remove()
    }
}
