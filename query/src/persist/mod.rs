//! Client-side persistence port for UI state that outlives a session
//! (theme choice, form drafts).
//!
//! The port is injected wherever persistence is needed instead of being
//! reached ambiently, so tests and SSR swap in [`MemoryPersister`]. Browser
//! builds enable the `local_storage` feature for [`LocalStoragePersister`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use crate::instant::Instant;

/// A store for small string-valued entries keyed by name.
#[async_trait(?Send)]
pub trait StatePersister {
    /// Persist an entry under `key`.
    async fn persist(&self, key: &str, entry: PersistEntry);
    /// Remove the entry under `key`.
    async fn remove(&self, key: &str);
    /// Retrieve the entry under `key`.
    async fn retrieve(&self, key: &str) -> Option<PersistEntry>;
    /// Drop every entry.
    async fn clear(&self);
}

/// A persisted value and when it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "local_storage",
    derive(miniserde::Serialize, miniserde::Deserialize)
)]
pub struct PersistEntry {
    /// The serialized value.
    pub value: String,
    /// Milliseconds since the Unix Epoch at write time.
    pub updated_at: u64,
}

impl PersistEntry {
    /// An entry stamped with the current time.
    pub fn now(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            updated_at: Instant::now().as_millis(),
        }
    }
}

/// In-memory persister for tests and server-side rendering.
#[derive(Clone, Default)]
pub struct MemoryPersister {
    entries: Rc<RefCell<HashMap<String, PersistEntry>>>,
}

impl MemoryPersister {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl StatePersister for MemoryPersister {
    async fn persist(&self, key: &str, entry: PersistEntry) {
        self.entries.borrow_mut().insert(key.to_string(), entry);
    }

    async fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    async fn retrieve(&self, key: &str) -> Option<PersistEntry> {
        self.entries.borrow().get(key).cloned()
    }

    async fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(feature = "local_storage")]
mod local_storage;
#[cfg(feature = "local_storage")]
pub use local_storage::LocalStoragePersister;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_persister_round_trips() {
        let persister = MemoryPersister::new();

        persister.persist("theme", PersistEntry::now("dark")).await;
        let entry = persister.retrieve("theme").await.expect("entry stored");
        assert_eq!(entry.value, "dark");

        persister.remove("theme").await;
        assert!(persister.retrieve("theme").await.is_none());
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let persister = MemoryPersister::new();
        persister.persist("a", PersistEntry::now("1")).await;
        persister.persist("b", PersistEntry::now("2")).await;
        assert_eq!(persister.len(), 2);

        persister.clear().await;
        assert!(persister.is_empty());
    }

    #[tokio::test]
    async fn persisting_twice_overwrites() {
        let persister = MemoryPersister::new();
        persister.persist("draft", PersistEntry::now("v1")).await;
        persister.persist("draft", PersistEntry::now("v2")).await;
        assert_eq!(persister.retrieve("draft").await.unwrap().value, "v2");
    }
}
