//! Browser Session Storage
//!
//! Persists the auth session in `localStorage` so it survives reloads.

use supabase_rest::SessionStorage;

/// `localStorage` backend. Looked up on every call since `web_sys::Storage`
/// cannot be held across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SessionStorage for BrowserStorage {
    fn load(&self, key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) {
        let Some(storage) = Self::local() else {
            tracing::warn!("localStorage unavailable, session not persisted");
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::warn!("failed to persist session: {:?}", e);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local() {
            if let Err(e) = storage.remove_item(key) {
                tracing::warn!("failed to clear session: {:?}", e);
            }
        }
    }
}
