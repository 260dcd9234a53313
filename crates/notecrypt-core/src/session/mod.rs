//! Session key lifecycle.
//!
//! - **manager**: the `KeyManager` state machine (`NoKey` / `KeyReady`)
//! - **store**: the `SessionStore` trait and an in-memory implementation

pub mod manager;
pub mod store;

pub use manager::{KeyManager, KeyState};
pub use store::{MemorySessionStore, SessionRecord, SessionStore};
