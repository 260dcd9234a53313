use std::sync::{Arc, Mutex};

use notecrypt_core::crypto::derive;
use notecrypt_core::note::{open_note, seal_note, NoteDraft};
use notecrypt_core::session::{KeyManager, KeyState, MemorySessionStore, SessionRecord, SessionStore};
use notecrypt_core::{NotecryptError, Result};

/// Store whose contents outlive the manager, like storage surviving a page reload.
#[derive(Clone, Default)]
struct SharedStore {
    inner: Arc<Mutex<Option<SessionRecord>>>,
}

impl SessionStore for SharedStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.inner.lock().expect("lock").clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        *self.inner.lock().expect("lock") = Some(record.clone());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        *self.inner.lock().expect("lock") = None;
        Ok(())
    }
}

#[test]
fn test_initialize_then_clear() {
    let mut manager = KeyManager::new(MemorySessionStore::new());
    manager
        .initialize("Tr0ub4dor&3", "alice")
        .expect("initialize should succeed");
    assert!(manager.has_key());
    assert_eq!(manager.account_identifier(), Some("alice"));

    let envelope = manager.seal("Buy milk").expect("seal should succeed");
    assert_eq!(manager.open(&envelope).unwrap(), "Buy milk");

    manager.clear().expect("clear should succeed");
    assert!(!manager.has_key());
    assert!(matches!(
        manager.open(&envelope),
        Err(NotecryptError::NoActiveKey)
    ));
    assert!(!manager.restore_from_session().unwrap());

    manager
        .initialize("Tr0ub4dor&3", "alice")
        .expect("re-initialize should succeed");
    assert_eq!(manager.open(&envelope).unwrap(), "Buy milk");
}

#[test]
fn test_reload_restores_without_password() {
    let store = SharedStore::default();

    let envelope = {
        let mut first = KeyManager::new(store.clone());
        first.initialize("Tr0ub4dor&3", "alice").unwrap();
        first.seal("survives reload").unwrap()
    };

    let mut reloaded = KeyManager::new(store.clone());
    assert_eq!(reloaded.state(), KeyState::NoKey);
    assert!(reloaded.restore_from_session().unwrap());
    assert_eq!(reloaded.state(), KeyState::KeyReady);
    assert_eq!(reloaded.account_identifier(), Some("alice"));
    assert_eq!(reloaded.open(&envelope).unwrap(), "survives reload");

    reloaded.clear().unwrap();
    let mut after_logout = KeyManager::new(store);
    assert!(!after_logout.restore_from_session().unwrap());
}

#[test]
fn test_failed_login_leaves_no_key() {
    let store = SharedStore::default();
    let mut manager = KeyManager::new(store.clone());
    manager.initialize("Tr0ub4dor&3", "alice").unwrap();

    // Caller rejected by the backend: clear runs on auth failure.
    manager.clear().unwrap();
    assert!(!manager.has_key());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_rejected_password_is_not_restored_after_reload() {
    let store = SharedStore::default();
    let mut manager = KeyManager::new(store.clone());
    manager.initialize("Tr0ub4dor&3", "alice").unwrap();

    let result = manager.initialize("", "alice");
    assert!(matches!(result, Err(NotecryptError::KeyDerivation(_))));
    assert!(!manager.has_key());
    assert!(store.load().unwrap().is_none());

    let mut reloaded = KeyManager::new(store);
    assert!(!reloaded.restore_from_session().unwrap());
    assert_eq!(reloaded.state(), KeyState::NoKey);
}

#[test]
fn test_install_key_derived_on_worker_thread() {
    let worker = std::thread::spawn(|| derive("Tr0ub4dor&3", "alice"));
    let key = worker.join().expect("worker").expect("derive should succeed");

    let mut manager = KeyManager::new(MemorySessionStore::new());
    manager.install("alice", key).unwrap();

    let draft = NoteDraft::new("Groceries", "Buy milk");
    let sealed = seal_note(&draft, &manager.key().unwrap()).unwrap();

    let mut other = KeyManager::new(MemorySessionStore::new());
    other.initialize("Tr0ub4dor&3", "alice").unwrap();
    assert_eq!(open_note(&sealed, &other.key().unwrap()).unwrap(), draft);
}

#[test]
fn test_switching_accounts_replaces_key() {
    let mut manager = KeyManager::new(MemorySessionStore::new());
    manager.initialize("Tr0ub4dor&3", "alice").unwrap();
    let alice_note = manager.seal("alice only").unwrap();

    manager.initialize("correct horse", "bob").unwrap();
    assert_eq!(manager.account_identifier(), Some("bob"));
    assert!(matches!(
        manager.open(&alice_note),
        Err(NotecryptError::Decryption(_))
    ));
}
