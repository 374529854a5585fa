//! Browser bindings, enabled with the `web` feature.
//!
//! `LocalStorageStore` keeps the session in the origin's `localStorage` and
//! `BrowserNavigator` performs full-page redirects through `location.href`.

use gloo::storage::{LocalStorage, Storage};
use tracing::warn;

use crate::auth::{SessionStore, StoreError};
use crate::navigation::Navigator;

fn js_error(e: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Unavailable(format!("{:?}", e))
}

/// Session store over `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl SessionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        LocalStorage::raw().get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw().set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        LocalStorage::raw().remove_item(key).map_err(js_error)
    }
}

/// Navigator that replaces the current page
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            warn!(path, "No window available for redirect");
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            warn!(path, error = ?e, "Redirect failed");
        }
    }
}
