//! LocalStorage-backed key-value store (wasm only)

use wasm_bindgen::JsValue;

use crate::error::{DrawError, Result};
use crate::persistence::KeyValueStore;

fn js_error(e: JsValue) -> DrawError {
    DrawError::Storage(format!("{:?}", e))
}

/// The page's `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| DrawError::Storage("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| DrawError::Storage("LocalStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}
