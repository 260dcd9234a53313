//! Key lifecycle manager.
//!
//! Owns the one active key of a session. The manager is an explicit value the
//! caller creates and passes around; there is no process-wide key holder.
//!
//! ```text
//!            initialize / install / restore_from_session
//!   NoKey  ----------------------------------------------->  KeyReady
//!          <-----------------------------------------------
//!                              clear
//! ```
//!
//! The key is held behind an `Arc` and replaced wholesale, never mutated in
//! place: a reader holding a handle from [`KeyManager::key`] keeps a complete
//! key even if the session is cleared meanwhile, and nobody ever sees a
//! partially written key.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::crypto::{AccountSecret, DerivedKey};
use crate::envelope;
use crate::error::{NotecryptError, Result};

use super::store::{SessionRecord, SessionStore};

/// Observable manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    NoKey,
    KeyReady,
}

struct ActiveKey {
    account_identifier: String,
    key: Arc<DerivedKey>,
}

/// Holds the session key and mirrors it into session-scoped storage.
pub struct KeyManager<S: SessionStore> {
    store: S,
    active: Option<ActiveKey>,
}

impl<S: SessionStore> KeyManager<S> {
    /// Create a manager in `NoKey` state backed by `store`.
    ///
    /// Nothing is read from the store until [`restore_from_session`] is called.
    ///
    /// [`restore_from_session`]: KeyManager::restore_from_session
    pub fn new(store: S) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn state(&self) -> KeyState {
        if self.active.is_some() {
            KeyState::KeyReady
        } else {
            KeyState::NoKey
        }
    }

    /// True iff a key is active.
    pub fn has_key(&self) -> bool {
        self.active.is_some()
    }

    /// Account the active key belongs to.
    pub fn account_identifier(&self) -> Option<&str> {
        self.active
            .as_ref()
            .map(|active| active.account_identifier.as_str())
    }

    /// Derive the account key and make it the session key.
    ///
    /// Works at registration as well as login: the key depends only on the
    /// credentials, not on server state.
    ///
    /// # Errors
    ///
    /// On `KeyDerivation` or `SessionStore` failure the manager is cleared,
    /// stored record included, so a rejected password never leaves an older
    /// key active or restorable. The original error is returned.
    pub fn initialize(&mut self, password: &str, account_identifier: &str) -> Result<()> {
        match AccountSecret::new(password, account_identifier) {
            Ok(secret) => self.initialize_with(secret),
            Err(err) => self.clear_after(err),
        }
    }

    /// Same as [`initialize`](KeyManager::initialize) for already wrapped credentials.
    pub fn initialize_with(&mut self, secret: AccountSecret) -> Result<()> {
        let account_identifier = secret.account_identifier().to_string();
        debug!(account = %account_identifier, "deriving session key");
        match secret.derive_key() {
            Ok(key) => self.install(account_identifier, key),
            Err(err) => self.clear_after(err),
        }
    }

    /// Adopt a key derived elsewhere, e.g. on a worker thread.
    pub fn install(&mut self, account_identifier: impl Into<String>, key: DerivedKey) -> Result<()> {
        let account_identifier = account_identifier.into();
        let record = SessionRecord::from_key(&account_identifier, &key);
        if let Err(err) = self.store.save(&record) {
            return self.clear_after(err);
        }
        info!(account = %account_identifier, "session key ready");
        self.active = Some(ActiveKey {
            account_identifier,
            key: Arc::new(key),
        });
        Ok(())
    }

    /// Reload the key from session storage without prompting for a password.
    ///
    /// Returns `Ok(true)` if the manager ends in `KeyReady`. With nothing
    /// stored, an already active key stays active and a `NoKey` manager stays
    /// `NoKey`. A stored record with unusable key material is deleted and
    /// treated as absent.
    pub fn restore_from_session(&mut self) -> Result<bool> {
        let record = match self.store.load()? {
            Some(record) => record,
            None => {
                debug!("no stored session key");
                return Ok(self.has_key());
            }
        };

        let key = match DerivedKey::from_slice(record.key_material()) {
            Some(key) => key,
            None => {
                warn!(
                    account = %record.account_identifier(),
                    "discarding stored session key with invalid length"
                );
                self.store.remove()?;
                return Ok(self.has_key());
            }
        };

        if let Some(active) = &self.active {
            if *active.key == key && active.account_identifier == record.account_identifier() {
                debug!(account = %active.account_identifier, "session key already active");
                return Ok(true);
            }
        }

        info!(account = %record.account_identifier(), "session key restored");
        self.active = Some(ActiveKey {
            account_identifier: record.account_identifier().to_string(),
            key: Arc::new(key),
        });
        Ok(true)
    }

    /// Discard the key and delete it from session storage.
    ///
    /// Call on logout and on authentication failure. The in-memory key is
    /// dropped first; a storage error is reported after the manager is
    /// already in `NoKey`.
    pub fn clear(&mut self) -> Result<()> {
        self.discard();
        self.store.remove()
    }

    /// Shared handle to the active key.
    ///
    /// # Errors
    ///
    /// Returns `NotecryptError::NoActiveKey` in `NoKey` state.
    pub fn key(&self) -> Result<Arc<DerivedKey>> {
        self.active
            .as_ref()
            .map(|active| Arc::clone(&active.key))
            .ok_or(NotecryptError::NoActiveKey)
    }

    /// Seal text with the active key.
    pub fn seal(&self, plaintext: &str) -> Result<String> {
        envelope::seal(plaintext, &*self.key()?)
    }

    /// Open an envelope with the active key.
    pub fn open(&self, envelope: &str) -> Result<String> {
        envelope::open(envelope, &*self.key()?)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `clear` after a failed login step, reporting `err` rather than
    /// any storage error from the clear itself.
    fn clear_after(&mut self, err: NotecryptError) -> Result<()> {
        if let Err(store_err) = self.clear() {
            warn!(error = %store_err, "failed to remove stored session key");
        }
        Err(err)
    }

    fn discard(&mut self) {
        if let Some(active) = self.active.take() {
            info!(account = %active.account_identifier, "session key cleared");
        }
    }
}

impl<S: SessionStore> std::fmt::Debug for KeyManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("state", &self.state())
            .field("account", &self.account_identifier())
            .finish()
    }
}
