//! UI snapshot and action types for DOM-based rendering
//!
//! One-way data flow: Rust builds a [`UiSnapshot`] after every change and JS
//! renders it; JS reports user intent back as a JSON-encoded [`UiAction`].

use serde::{Deserialize, Serialize};

use crate::app::{LoadState, PortalApp};
use crate::router::LocationPort;
use crate::storage::PersistencePort;
use crate::theme::ChainColor;
use crate::view::{NetworkView, Tab};

/// Snapshot of portal state for DOM rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    /// "loading", "ready" or "unavailable"
    pub status: &'static str,
    /// Developer-facing reason when `status == "unavailable"`
    pub error: Option<String>,
    /// What to check when the data file is missing or malformed
    pub hint: Option<&'static str>,

    pub banner_visible: bool,
    pub sidebar_open: bool,
    pub search: String,

    /// Sidebar rows (search applied)
    pub networks: Vec<NetworkItem>,
    pub networks_total: usize,

    pub tabs: Vec<TabItem>,
    /// Active network card, absent while unresolved
    pub active: Option<NetworkView>,

    /// Current location fragment
    pub fragment: String,
    /// Full link to the current view
    pub share_url: String,
    pub toast: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkItem {
    pub identifier: String,
    pub title: String,
    pub color_css: String,
    pub logo: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub tab: Tab,
    pub title: &'static str,
    pub selected: bool,
}

impl UiSnapshot {
    pub fn from_app<L: LocationPort, P: PersistencePort>(app: &PortalApp<L, P>) -> Self {
        let (status, error) = match app.load_state() {
            LoadState::Loading => ("loading", None),
            LoadState::Ready => ("ready", None),
            LoadState::Unavailable(e) => ("unavailable", Some(e.clone())),
        };

        let active_id = app.active();
        let networks = app
            .visible_networks()
            .into_iter()
            .filter_map(|id| app.chains().get(id))
            .map(|spec| NetworkItem {
                identifier: spec.identifier.clone(),
                title: crate::view::capitalize_first(&spec.title),
                color_css: ChainColor::parse(&spec.color).css_background(),
                logo: spec.logo.clone(),
                selected: active_id == Some(spec.identifier.as_str()),
            })
            .collect();

        let tabs = Tab::ALL
            .iter()
            .map(|&tab| TabItem {
                tab,
                title: tab.title(),
                selected: tab == app.tab(),
            })
            .collect();

        UiSnapshot {
            status,
            error,
            hint: app.load_hint(),
            banner_visible: app.banner_visible(),
            sidebar_open: app.sidebar_open(),
            search: app.search().to_string(),
            networks,
            networks_total: app.chains().len(),
            tabs,
            active: app.view(),
            fragment: app.fragment(),
            share_url: app.resolver().location().share_url(),
            toast: app.toast().map(str::to_string),
        }
    }
}

/// Values the page can ask to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CopyField {
    GenesisHash,
    RpcEndpoint,
    /// Hash shown in the selected QR's provenance block
    SourceHash,
    /// Link to the current view (full URL where the page address is known)
    Link,
}

/// Actions that JS can send to Rust.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum UiAction {
    SelectNetwork { id: String },
    SetTab { tab: Tab },
    /// Index into the metadata QR options (0 = current, 1 = next).
    SelectQr { index: usize },
    SetSearch { text: String },
    ToggleSidebar,
    HideBanner,
    DismissToast,
    Copy { field: CopyField },
}
