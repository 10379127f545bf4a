use cfg_if::cfg_if;

use super::{PersistEntry, StatePersister};
use async_trait::async_trait;

/// A persister backed by the browser's local storage.
#[derive(Clone, Copy)]
pub struct LocalStoragePersister;

#[cfg(any(feature = "hydrate", feature = "csr"))]
thread_local! {
    static LOCAL_STORAGE: Option<web_sys::Storage> =
        leptos::window().local_storage().ok().flatten();
}

#[cfg(any(feature = "hydrate", feature = "csr"))]
fn local_storage() -> Option<web_sys::Storage> {
    LOCAL_STORAGE.with(Clone::clone)
}

#[async_trait(?Send)]
impl StatePersister for LocalStoragePersister {
    async fn persist(&self, key: &str, entry: PersistEntry) {
        cfg_if! {
            if #[cfg(any(feature = "hydrate", feature = "csr"))] {
                if let Some(storage) = local_storage() {
                    let value = miniserde::json::to_string(&entry);
                    let _ = storage.set(key, &value);
                }
            } else {
                let _ = entry;
                let _ = key;
            }
        }
    }

    async fn remove(&self, key: &str) {
        cfg_if! {
            if #[cfg(any(feature = "hydrate", feature = "csr"))] {
                if let Some(storage) = local_storage() {
                    let _ = storage.remove_item(key);
                }
            } else {
                let _ = key;
            }
        }
    }

    async fn retrieve(&self, key: &str) -> Option<PersistEntry> {
        cfg_if! {
            if #[cfg(any(feature = "hydrate", feature = "csr"))] {
                if let Some(storage) = local_storage() {
                    if let Some(value) = storage.get_item(key).ok().flatten() {
                        return miniserde::json::from_str(&value).ok();
                    }
                }
                None
            } else {
                let _ = key;
                None
            }
        }
    }

    async fn clear(&self) {
        cfg_if! {
            if #[cfg(any(feature = "hydrate", feature = "csr"))] {
                if let Some(storage) = local_storage() {
                    let _ = storage.clear();
                }
            } else {
            }
        }
    }
}
