//! Platform seams: clipboard, persisted key/value store, browser location.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod web;
        pub use web::{copy_to_clipboard, BrowserLocation, LocalStorageStore};
    } else if #[cfg(feature = "native")] {
        mod native;
        pub use native::copy_to_clipboard;
    } else {
        /// No clipboard without a platform backend.
        pub fn copy_to_clipboard(_content: &str) -> bool {
            false
        }
    }
}
