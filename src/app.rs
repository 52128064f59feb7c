//! Headless portal state shared by the terminal and DOM front ends.

use crate::error::Result;
use crate::resolver::Resolver;
use crate::router::{LocationPort, Route};
use crate::storage::{PersistencePort, HIDE_BANNER_KEY};
use crate::types::{ChainSpec, Chains};
use crate::ui_snapshot::{CopyField, UiAction};
use crate::view::{self, NetworkView, Tab};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Data could not be loaded; the portal renders empty.
    Unavailable(String),
}

/// Side effect requested by an action, carried out by the platform layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Copy(String),
}

pub struct PortalApp<L, P> {
    chains: Chains,
    load_state: LoadState,
    load_hint: Option<&'static str>,
    resolver: Resolver<L, P>,

    tab: Tab,
    qr_index: usize,

    search: String,
    cursor: usize, // highlighted row in the filtered sidebar (keyboard)
    sidebar_open: bool,
    banner_hidden: bool,

    toast: Option<String>,
}

impl<L: LocationPort, P: PersistencePort> PortalApp<L, P> {
    pub fn new(location: L, store: P) -> Self {
        let banner_hidden = store.get(HIDE_BANNER_KEY).as_deref() == Some("true");
        Self {
            chains: Chains::new(),
            load_state: LoadState::Loading,
            load_hint: None,
            resolver: Resolver::new(location, store),
            tab: Tab::default(),
            qr_index: 0,
            search: String::new(),
            cursor: 0,
            sidebar_open: false,
            banner_hidden,
            toast: None,
        }
    }

    // ----- getters -----
    pub fn chains(&self) -> &Chains {
        &self.chains
    }
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }
    /// Developer hint for a failed load.
    pub fn load_hint(&self) -> Option<&'static str> {
        self.load_hint
    }
    pub fn resolver(&self) -> &Resolver<L, P> {
        &self.resolver
    }
    pub fn active(&self) -> Option<&str> {
        self.resolver.active()
    }
    pub fn tab(&self) -> Tab {
        self.tab
    }
    pub fn qr_index(&self) -> usize {
        self.qr_index
    }
    pub fn search(&self) -> &str {
        &self.search
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }
    pub fn banner_visible(&self) -> bool {
        !self.banner_hidden
    }
    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }
    pub fn fragment(&self) -> String {
        self.resolver.location().fragment()
    }

    pub fn active_spec(&self) -> Option<&ChainSpec> {
        self.active().and_then(|id| self.chains.get(id))
    }

    /// View of the active network, always derived from one lookup.
    pub fn view(&self) -> Option<NetworkView> {
        self.active_spec()
            .map(|spec| NetworkView::from_spec(spec, self.qr_index))
    }

    pub fn visible_networks(&self) -> Vec<&str> {
        view::filter_networks(&self.chains, &self.search)
    }

    // ----- lifecycle -----

    /// Data load finished. Failures leave the portal empty.
    pub fn on_data(&mut self, result: Result<Chains>) {
        match result {
            Ok(chains) => {
                log::info!("[data] loaded {} networks", chains.len());
                self.chains = chains;
                self.load_state = LoadState::Ready;
                self.load_hint = None;
            }
            Err(e) => {
                log::error!("[data] {e}");
                self.load_hint = e.hint();
                if let Some(hint) = self.load_hint {
                    log::warn!("[data] {hint}");
                }
                self.chains = Chains::new();
                self.load_state = LoadState::Unavailable(e.to_string());
            }
        }
        self.resolver.on_data_loaded(&self.chains);
        self.adopt_route();
        self.cursor_to_active();
    }

    /// Location changed outside the app (hashchange, back/forward).
    pub fn on_navigation(&mut self) {
        if self.resolver.on_navigation() {
            self.cursor_to_active();
        }
        self.adopt_route();
    }

    // ----- user actions -----

    pub fn select_network(&mut self, id: &str) {
        let changed = self.active() != Some(id);
        if self.resolver.select(id) {
            if changed {
                self.qr_index = 0;
            }
            self.sidebar_open = false;
            self.cursor_to_active();
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.sync_view_params();
    }

    pub fn set_qr(&mut self, index: usize) {
        let Some(spec) = self.active_spec() else {
            return;
        };
        self.qr_index = view::clamp_qr_index(spec, index);
        self.sync_view_params();
    }

    pub fn set_search(&mut self, text: String) {
        self.search = text;
        self.cursor = 0;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn hide_banner(&mut self) {
        self.banner_hidden = true;
        self.resolver.store_mut().set(HIDE_BANNER_KEY, "true");
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let n = self.visible_networks().len();
        if n > 0 {
            self.cursor = (self.cursor + 1).min(n - 1);
        }
    }

    /// Select the highlighted sidebar row.
    pub fn activate_cursor(&mut self) {
        let target = self.visible_networks().get(self.cursor).map(|s| s.to_string());
        if let Some(id) = target {
            self.select_network(&id);
        }
    }

    pub fn show_toast(&mut self, msg: String) {
        self.toast = Some(msg);
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }

    /// Text for a copy request, from the active network.
    pub fn copy_text(&self, field: CopyField) -> Option<String> {
        let spec = self.active_spec()?;
        let text = match field {
            CopyField::GenesisHash => spec.genesis_hash.clone(),
            CopyField::RpcEndpoint => spec.rpc_endpoint.clone(),
            CopyField::Link => self.resolver.location().share_url(),
            CopyField::SourceHash => {
                let v = NetworkView::from_spec(spec, self.qr_index);
                v.metadata
                    .selected_option()?
                    .source_rows
                    .iter()
                    .find(|r| r.kind == view::RowKind::Hash)?
                    .value
                    .clone()
            }
        };
        Some(text)
    }

    pub fn apply(&mut self, action: UiAction) -> Effect {
        match action {
            UiAction::SelectNetwork { id } => self.select_network(&id),
            UiAction::SetTab { tab } => self.set_tab(tab),
            UiAction::SelectQr { index } => self.set_qr(index),
            UiAction::SetSearch { text } => self.set_search(text),
            UiAction::ToggleSidebar => self.toggle_sidebar(),
            UiAction::HideBanner => self.hide_banner(),
            UiAction::DismissToast => self.clear_toast(),
            UiAction::Copy { field } => {
                return match self.copy_text(field) {
                    Some(text) => Effect::Copy(text),
                    None => Effect::None,
                };
            }
        }
        Effect::None
    }

    // ----- internals -----

    /// Pull tab and QR index from the location.
    fn adopt_route(&mut self) {
        let route = self.resolver.route();
        self.tab = route.tab.unwrap_or_default();
        self.qr_index = match (self.active_spec(), route.qr) {
            (Some(spec), Some(qr)) => view::clamp_qr_index(spec, qr),
            _ => 0,
        };
    }

    fn sync_view_params(&mut self) {
        let qr = (self.tab == Tab::Metadata && self.qr_index > 0).then_some(self.qr_index);
        self.resolver.set_view_params(Route {
            network: None,
            tab: Some(self.tab),
            qr,
        });
    }

    fn cursor_to_active(&mut self) {
        let Some(active) = self.active().map(str::to_string) else {
            return;
        };
        let pos = self.visible_networks().iter().position(|id| *id == active);
        if let Some(pos) = pos {
            self.cursor = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryLocation;
    use crate::storage::{MemoryStore, CHOSEN_NETWORK_KEY};

    fn app(fragment: &str, store: MemoryStore) -> PortalApp<MemoryLocation, MemoryStore> {
        let mut app = PortalApp::new(MemoryLocation::new(fragment), store);
        app.on_data(Ok(crate::test_support::chains(&["polkadot", "kusama", "westend"])));
        app
    }

    #[test]
    fn loading_failure_renders_empty() {
        let mut app = PortalApp::new(MemoryLocation::new("#/kusama"), MemoryStore::new());
        assert_eq!(app.load_state(), &LoadState::Loading);
        app.on_data(crate::data::parse_chains("<html>404</html>"));
        assert!(matches!(app.load_state(), LoadState::Unavailable(_)));
        assert_eq!(app.load_hint(), Some(crate::error::GENERATE_HINT));
        assert!(app.view().is_none());
        assert!(app.visible_networks().is_empty());
    }

    #[test]
    fn successful_load_has_no_hint() {
        let app = app("", MemoryStore::new());
        assert_eq!(app.load_state(), &LoadState::Ready);
        assert_eq!(app.load_hint(), None);
    }

    #[test]
    fn adopts_tab_and_clamps_qr_from_url() {
        let app = app("#/kusama?tab=metadata&qr=7", MemoryStore::new());
        assert_eq!(app.active(), Some("kusama"));
        assert_eq!(app.tab(), Tab::Metadata);
        assert_eq!(app.qr_index(), 0);
    }

    #[test]
    fn switching_network_rederives_view_and_resets_qr() {
        let mut app = app("#/kusama", MemoryStore::new());
        app.set_tab(Tab::Metadata);
        app.select_network("westend");
        let view = app.view().unwrap();
        assert_eq!(view.identifier, "westend");
        assert_eq!(view.specs_qr_path, "qr/westend_specs.png");
        assert_eq!(app.qr_index(), 0);
        assert_eq!(app.tab(), Tab::Metadata);
        assert_eq!(app.fragment(), "#/westend?tab=metadata");
    }

    #[test]
    fn tab_change_is_written_to_url() {
        let mut app = app("", MemoryStore::new());
        assert_eq!(app.fragment(), "#/polkadot");
        app.apply(UiAction::SetTab { tab: Tab::Metadata });
        assert_eq!(app.fragment(), "#/polkadot?tab=metadata");
        app.on_navigation();
        assert_eq!(app.tab(), Tab::Metadata);
    }

    #[test]
    fn banner_dismissal_persists() {
        let mut a = app("", MemoryStore::new());
        assert!(a.banner_visible());
        a.apply(UiAction::HideBanner);
        assert!(!a.banner_visible());

        let store = a.resolver().store().clone();
        let b = app("", store);
        assert!(!b.banner_visible());
    }

    #[test]
    fn keyboard_cursor_selects() {
        let mut app = app("", MemoryStore::new());
        assert_eq!(app.cursor(), 0);
        app.cursor_down();
        app.cursor_down();
        app.cursor_down();
        assert_eq!(app.cursor(), 2);
        app.activate_cursor();
        assert_eq!(app.active(), Some("westend"));
        assert_eq!(
            app.resolver().store().get(CHOSEN_NETWORK_KEY).as_deref(),
            Some("westend")
        );
    }

    #[test]
    fn search_narrows_sidebar() {
        let mut app = app("", MemoryStore::new());
        app.apply(UiAction::SetSearch { text: "SAM".into() });
        assert_eq!(app.visible_networks(), ["kusama"]);
        app.activate_cursor();
        assert_eq!(app.active(), Some("kusama"));
    }

    #[test]
    fn copy_returns_active_values() {
        let mut app = app("#/kusama", MemoryStore::new());
        assert_eq!(
            app.apply(UiAction::Copy { field: CopyField::RpcEndpoint }),
            Effect::Copy("wss://kusama".into())
        );
        assert_eq!(
            app.apply(UiAction::Copy { field: CopyField::SourceHash }),
            Effect::None
        );
    }

    #[test]
    fn copied_link_is_a_full_url() {
        let mut shared = PortalApp::new(
            MemoryLocation::with_base("https://metadata.parity.io/", "#/kusama"),
            MemoryStore::new(),
        );
        shared.on_data(Ok(crate::test_support::chains(&["polkadot", "kusama"])));
        shared.apply(UiAction::SetTab { tab: Tab::Metadata });
        assert_eq!(
            shared.apply(UiAction::Copy { field: CopyField::Link }),
            Effect::Copy("https://metadata.parity.io/#/kusama?tab=metadata".into())
        );

        // Without a page address only the fragment is known.
        let mut bare = app("#/kusama", MemoryStore::new());
        assert_eq!(
            bare.apply(UiAction::Copy { field: CopyField::Link }),
            Effect::Copy("#/kusama".into())
        );
    }
}
