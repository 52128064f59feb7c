//! Browser platform: `window.localStorage`, `window.location.hash`, clipboard.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::router::LocationPort;
use crate::storage::PersistencePort;

/// `window.localStorage`, silently absent in private modes that block it.
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("[storage] localStorage unavailable; choices will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistencePort for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(storage) = &self.storage else { return };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("[storage] set {key} failed: {e:?}");
        }
    }
}

/// The page's own location. Writes go through `history.replaceState` so the
/// back button never walks through resolver rewrites.
#[derive(Default)]
pub struct BrowserLocation;

impl LocationPort for BrowserLocation {
    fn fragment(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        let Some(window) = web_sys::window() else { return };
        let replaced = window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(fragment)));
        if let Err(e) = replaced {
            log::warn!("[router] replaceState failed: {e:?}");
        }
    }

    fn share_url(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_else(|| self.fragment())
    }
}

#[wasm_bindgen]
extern "C" {
    // Optional page-provided bridge; `catch` turns a missing function into Err.
    #[wasm_bindgen(js_namespace = window, js_name = __copy_text, catch)]
    fn copy_text_bridge(s: &str) -> Result<js_sys::Promise, JsValue>;
}

pub fn copy_to_clipboard(s: &str) -> bool {
    if let Ok(promise) = copy_text_bridge(s) {
        wasm_bindgen_futures::spawn_local(async move {
            let _ = JsFuture::from(promise).await;
        });
        return true;
    }

    // Secure contexts only.
    let Some(clip) = web_sys::window().and_then(|w| w.navigator().clipboard()) else {
        return false;
    };
    let p = clip.write_text(s);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(p).await {
            log::warn!("[clipboard] write failed: {e:?}");
        }
    });
    true
}
