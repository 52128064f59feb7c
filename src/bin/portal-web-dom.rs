#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM-based web frontend for the Metadata Portal.
//
// JS side:
//   import init, { WasmPortal } from "./portal-web-dom.js";
//   const portal = new WasmPortal();
//   await portal.load("data.json");
//   render(JSON.parse(portal.snapshot_json()));
//   window.addEventListener("hashchange", () => render(JSON.parse(portal.on_hash_change())));
//   render(JSON.parse(portal.handle_action_json(JSON.stringify({ type: "SelectNetwork", id: "kusama" }))));

#[cfg(target_arch = "wasm32")]
mod dom {
    use tokio::sync::mpsc::{error::TryRecvError, unbounded_channel, UnboundedReceiver, UnboundedSender};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::window;

    use metadata_portal::{
        app::{Effect, PortalApp},
        constants::messages,
        data,
        error::Result as PortalResult,
        platform::{self, BrowserLocation, LocalStorageStore},
        theme::ChainColor,
        types::Chains,
        ui_snapshot::{UiAction, UiSnapshot},
    };

    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
    }

    /// Wasm-exposed portal wrapper.
    ///
    /// Holds the headless app and the receiving end of the data load.
    #[wasm_bindgen]
    pub struct WasmPortal {
        app: PortalApp<BrowserLocation, LocalStorageStore>,
        data_tx: UnboundedSender<PortalResult<Chains>>,
        data_rx: UnboundedReceiver<PortalResult<Chains>>,
    }

    #[wasm_bindgen]
    impl WasmPortal {
        #[wasm_bindgen(constructor)]
        #[allow(clippy::new_without_default)]
        pub fn new() -> WasmPortal {
            let (data_tx, data_rx) = unbounded_channel();
            WasmPortal {
                app: PortalApp::new(BrowserLocation, LocalStorageStore::new()),
                data_tx,
                data_rx,
            }
        }

        /// Fetch the chains file (relative to the page). Resolves once the
        /// result is queued; the next snapshot reflects it.
        #[wasm_bindgen]
        pub fn load(&self, data_url: String) -> js_sys::Promise {
            let tx = self.data_tx.clone();
            wasm_bindgen_futures::future_to_promise(async move {
                let url = absolute_url(&data_url);
                if tx.send(data::fetch_chains(&url).await).is_err() {
                    log::warn!("[WasmPortal] portal dropped before data arrived");
                }
                Ok(JsValue::UNDEFINED)
            })
        }

        /// Get a fresh snapshot as JSON (drains a pending data load first).
        #[wasm_bindgen]
        pub fn snapshot_json(&mut self) -> String {
            self.drain_data();
            self.snapshot()
        }

        /// Apply an action (JSON-encoded UiAction) and return an updated snapshot.
        #[wasm_bindgen]
        pub fn handle_action_json(&mut self, action_json: String) -> String {
            self.drain_data();

            match serde_json::from_str::<UiAction>(&action_json) {
                Ok(action) => {
                    if let Effect::Copy(text) = self.app.apply(action) {
                        let msg = if platform::copy_to_clipboard(&text) {
                            messages::COPY_GENERIC
                        } else {
                            messages::COPY_FAILED
                        };
                        self.app.show_toast(msg.to_string());
                    }
                }
                Err(e) => log::warn!("Failed to deserialize UiAction ({e}): {action_json:?}"),
            }

            self.snapshot()
        }

        /// `hashchange` listener: back/forward or an edited address bar.
        #[wasm_bindgen]
        pub fn on_hash_change(&mut self) -> String {
            self.drain_data();
            self.app.on_navigation();
            self.snapshot()
        }
    }

    impl WasmPortal {
        fn drain_data(&mut self) {
            loop {
                match self.data_rx.try_recv() {
                    Ok(result) => self.app.on_data(result),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break,
                }
            }
        }

        fn snapshot(&self) -> String {
            self.sync_accent();
            let snap = UiSnapshot::from_app(&self.app);
            serde_json::to_string(&snap).unwrap_or_else(|e| {
                log::error!("Failed to serialize UiSnapshot: {e}");
                "{}".to_string()
            })
        }

        /// Expose the active network's color as `--network-color` on <html>.
        fn sync_accent(&self) {
            let Some(spec) = self.app.active_spec() else { return };
            let color = ChainColor::parse(&spec.color);
            let value = color.accent().map(|rgb| rgb.to_hex()).unwrap_or_else(|| spec.color.clone());

            let root = window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element());
            if let Some(html_root) = root.as_ref().and_then(|r| r.dyn_ref::<web_sys::HtmlElement>()) {
                if let Err(e) = html_root.style().set_property("--network-color", &value) {
                    log::warn!("[theme] Failed to set --network-color: {e:?}");
                }
            }
        }
    }

    /// Resolve a page-relative data path against the current location.
    fn absolute_url(raw: &str) -> String {
        let base = window().and_then(|w| w.location().href().ok());
        match base.map(|b| web_sys::Url::new_with_base(raw, &b)) {
            Some(Ok(url)) => url.href(),
            _ => raw.to_string(),
        }
    }
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("portal-web-dom is only supported on wasm32 (browser) target.");
}
