//! `localStorage` backend for the session store.
//!
//! The core's `KeyValueSessionStore` owns the two-key layout and the
//! clear ordering; this type only moves strings in and out of the browser.
//! Off-browser every read is empty and every write fails.

#[cfg(all(test, not(feature = "csr")))]
#[path = "session_storage_test.rs"]
mod session_storage_test;

use evalboard::StoreError;
use evalboard::store::KeyValue;

/// Handle to `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(feature = "csr")]
fn storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StoreError::Unavailable("localStorage disabled".to_owned())),
        Err(e) => Err(StoreError::Unavailable(format!("{e:?}"))),
    }
}

impl KeyValue for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            match storage() {
                Ok(storage) => storage.get_item(key).unwrap_or_default(),
                Err(_) => None,
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            storage()?
                .set_item(key, value)
                .map_err(|e| StoreError::Unavailable(format!("could not write {key}: {e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = value;
            Err(StoreError::Unavailable(format!("no browser storage for {key}")))
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(feature = "csr")]
        {
            storage()?
                .remove_item(key)
                .map_err(|e| StoreError::Unavailable(format!("could not remove {key}: {e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Ok(())
        }
    }
}
