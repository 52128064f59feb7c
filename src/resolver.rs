//! Active network selection.
//!
//! The active network comes from three candidates, in order:
//!
//! 1. the network token in the URL fragment, compared as typed;
//! 2. the persisted choice, lower-cased before comparison;
//! 3. the first network in data order.
//!
//! An empty data set yields no selection. The asymmetry between 1 and 2 is
//! deliberate: stored values have always been lower-case identifiers, URL
//! tokens are whatever the link contains.
//!
//! After every resolution the fragment is rewritten in place (no history
//! entry) so the address bar always deep-links to what is on screen. The
//! resolver remembers the last fragment it wrote and ignores the single
//! navigation notification that echoes that write.

use crate::router::{self, LocationPort, Route};
use crate::storage::{PersistencePort, CHOSEN_NETWORK_KEY};
use crate::types::Chains;

/// Which candidate won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceSource {
    Url,
    Stored,
    Default,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub identifier: String,
    pub source: ChoiceSource,
}

/// Pure precedence resolution over the loaded identifiers.
pub fn resolve<'a, K>(keys: K, url_network: Option<&str>, stored: Option<&str>) -> Option<Resolution>
where
    K: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&str> = keys.into_iter().collect();

    if let Some(url) = url_network {
        if keys.iter().any(|k| *k == url) {
            return Some(Resolution {
                identifier: url.to_string(),
                source: ChoiceSource::Url,
            });
        }
        log::debug!("[resolver] URL network {url:?} is not loaded");
    }

    if let Some(stored) = stored {
        let stored = stored.to_lowercase();
        if keys.iter().any(|k| *k == stored) {
            return Some(Resolution {
                identifier: stored,
                source: ChoiceSource::Stored,
            });
        }
        log::debug!("[resolver] stored network {stored:?} is not loaded");
    }

    keys.first().map(|first| Resolution {
        identifier: first.to_string(),
        source: ChoiceSource::Default,
    })
}

/// Resolver state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Data not loaded yet, or loaded empty.
    #[default]
    Unresolved,
    Resolved(String),
}

impl Selection {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Selection::Unresolved => None,
            Selection::Resolved(id) => Some(id),
        }
    }
}

/// Stateful resolver bound to a location and a store.
pub struct Resolver<L, P> {
    location: L,
    store: P,
    keys: Vec<String>,
    selection: Selection,
    last_written: Option<String>,
}

impl<L: LocationPort, P: PersistencePort> Resolver<L, P> {
    pub fn new(location: L, store: P) -> Self {
        Self {
            location,
            store,
            keys: Vec::new(),
            selection: Selection::Unresolved,
            last_written: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active(&self) -> Option<&str> {
        self.selection.identifier()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// For hosts that drive the location themselves (and tests).
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Current route as encoded in the location.
    pub fn route(&self) -> Route {
        router::parse(&self.location.fragment())
    }

    /// Data finished loading (or was replaced by a fresh fetch).
    pub fn on_data_loaded(&mut self, chains: &Chains) -> Option<&str> {
        self.keys = chains.keys().cloned().collect();
        self.recompute();
        self.active()
    }

    /// The location changed outside our control (back/forward, edited URL).
    /// Returns `true` when the active network changed.
    pub fn on_navigation(&mut self) -> bool {
        let fragment = self.location.fragment();
        // The guard covers exactly one echo; any other change clears it so a
        // later return to that fragment (back button) is re-resolved.
        if self.last_written.take().as_deref() == Some(fragment.as_str()) {
            log::debug!("[resolver] ignoring echo of own write {fragment}");
            return false;
        }
        let before = self.selection.clone();
        self.recompute();
        before != self.selection
    }

    /// Explicit user choice. Unknown identifiers are refused.
    pub fn select(&mut self, identifier: &str) -> bool {
        if !self.keys.iter().any(|k| k == identifier) {
            log::warn!("[resolver] refusing selection of unknown network {identifier:?}");
            return false;
        }
        self.store.set(CHOSEN_NETWORK_KEY, identifier);
        self.selection = Selection::Resolved(identifier.to_string());

        let current = self.route();
        let same = current.network.as_deref() == Some(identifier);
        self.write_route(Route {
            network: Some(identifier.to_string()),
            tab: current.tab,
            qr: if same { current.qr } else { None },
        });
        true
    }

    /// Rewrite the view parameters while keeping the network token.
    pub fn set_view_params(&mut self, route: Route) {
        let network = self.active().map(str::to_string);
        self.write_route(Route { network, ..route });
    }

    fn recompute(&mut self) {
        let route = self.route();
        let stored = self.store.get(CHOSEN_NETWORK_KEY);
        let resolution = resolve(
            self.keys.iter().map(String::as_str),
            route.network.as_deref(),
            stored.as_deref(),
        );

        match resolution {
            None => {
                self.selection = Selection::Unresolved;
            }
            Some(Resolution { identifier, source }) => {
                log::info!("[resolver] active network {identifier} ({source:?})");
                let url_matches = route.network.as_deref() == Some(identifier.as_str());
                self.selection = Selection::Resolved(identifier.clone());
                if !url_matches {
                    self.write_route(Route {
                        network: Some(identifier),
                        tab: route.tab,
                        qr: None,
                    });
                }
            }
        }
    }

    fn write_route(&mut self, route: Route) {
        let fragment = router::format(&route);
        if self.location.fragment() != fragment {
            log::debug!("[router] replace {fragment}");
            self.location.replace_fragment(&fragment);
            self.last_written = Some(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryLocation;
    use crate::storage::MemoryStore;

    const KEYS: [&str; 3] = ["polkadot", "kusama", "westend"];

    #[test]
    fn url_wins_over_store() {
        let r = resolve(KEYS, Some("westend"), Some("kusama")).unwrap();
        assert_eq!(r.identifier, "westend");
        assert_eq!(r.source, ChoiceSource::Url);
    }

    #[test]
    fn falls_through_to_store_then_first() {
        let r = resolve(KEYS, Some("rococo"), Some("kusama")).unwrap();
        assert_eq!((r.identifier.as_str(), r.source), ("kusama", ChoiceSource::Stored));

        let r = resolve(KEYS, Some("rococo"), Some("rococo")).unwrap();
        assert_eq!((r.identifier.as_str(), r.source), ("polkadot", ChoiceSource::Default));

        let r = resolve(KEYS, None, None).unwrap();
        assert_eq!(r.identifier, "polkadot");
    }

    #[test]
    fn empty_keys_resolve_to_nothing() {
        assert_eq!(resolve(std::iter::empty(), Some("polkadot"), Some("polkadot")), None);
    }

    #[test]
    fn stored_value_is_lowercased_url_is_not() {
        let r = resolve(KEYS, None, Some("Kusama")).unwrap();
        assert_eq!(r.identifier, "kusama");
        let r = resolve(KEYS, Some("Kusama"), None).unwrap();
        assert_eq!(r.source, ChoiceSource::Default);
    }

    fn chains() -> Chains {
        crate::test_support::chains(&KEYS)
    }

    #[test]
    fn unresolved_until_data_loads() {
        let r = Resolver::new(MemoryLocation::default(), MemoryStore::new());
        assert_eq!(r.selection(), &Selection::Unresolved);
        assert_eq!(r.active(), None);
    }

    #[test]
    fn empty_data_stays_unresolved_and_leaves_url_alone() {
        let mut r = Resolver::new(MemoryLocation::new("#/kusama"), MemoryStore::new());
        assert_eq!(r.on_data_loaded(&Chains::new()), None);
        assert_eq!(r.location().fragment(), "#/kusama");
    }

    #[test]
    fn load_rewrites_invalid_url() {
        let mut r = Resolver::new(
            MemoryLocation::new("#/rococo?tab=metadata&qr=1"),
            MemoryStore::with(CHOSEN_NETWORK_KEY, "westend"),
        );
        assert_eq!(r.on_data_loaded(&chains()), Some("westend"));
        assert_eq!(r.location().fragment(), "#/westend?tab=metadata");
        assert_eq!(r.location().replacements, 1);
    }

    #[test]
    fn valid_url_is_not_rewritten() {
        let mut r = Resolver::new(MemoryLocation::new("#/kusama?tab=metadata"), MemoryStore::new());
        assert_eq!(r.on_data_loaded(&chains()), Some("kusama"));
        assert_eq!(r.location().replacements, 0);
    }

    #[test]
    fn select_persists_and_rewrites() {
        let mut r = Resolver::new(MemoryLocation::new(""), MemoryStore::new());
        r.on_data_loaded(&chains());
        assert!(r.select("kusama"));
        assert_eq!(r.active(), Some("kusama"));
        assert_eq!(r.store().get(CHOSEN_NETWORK_KEY).as_deref(), Some("kusama"));
        assert_eq!(r.location().fragment(), "#/kusama");

        assert!(!r.select("rococo"));
        assert_eq!(r.active(), Some("kusama"));
    }

    #[test]
    fn own_write_is_not_a_navigation() {
        let mut r = Resolver::new(MemoryLocation::new("#/nope"), MemoryStore::new());
        r.on_data_loaded(&chains());
        let writes = r.location().replacements;
        assert!(!r.on_navigation());
        assert_eq!(r.location().replacements, writes);
    }

    #[test]
    fn external_navigation_reresolves() {
        let mut r = Resolver::new(MemoryLocation::new(""), MemoryStore::new());
        r.on_data_loaded(&chains());
        assert_eq!(r.active(), Some("polkadot"));

        r.location.navigate("#/westend");
        assert!(r.on_navigation());
        assert_eq!(r.active(), Some("westend"));
        // Navigation alone does not touch the store.
        assert_eq!(r.store().get(CHOSEN_NETWORK_KEY), None);
    }

    #[test]
    fn back_to_an_earlier_own_write_is_reresolved() {
        let mut r = Resolver::new(MemoryLocation::new(""), MemoryStore::new());
        r.on_data_loaded(&chains());
        assert!(r.select("kusama"));

        r.location.navigate("#/westend");
        assert!(r.on_navigation());
        assert_eq!(r.active(), Some("westend"));

        r.location.navigate("#/kusama");
        assert!(r.on_navigation());
        assert_eq!(r.active(), Some("kusama"));
    }

    #[test]
    fn echo_guard_is_consumed_once() {
        let mut r = Resolver::new(MemoryLocation::new("#/nope"), MemoryStore::new());
        r.on_data_loaded(&chains());
        assert_eq!(r.location().fragment(), "#/polkadot");
        assert!(!r.on_navigation());

        // Same fragment again: resolution runs and is a no-op.
        let writes = r.location().replacements;
        assert!(!r.on_navigation());
        assert_eq!(r.active(), Some("polkadot"));
        assert_eq!(r.location().replacements, writes);
    }

    #[test]
    fn view_params_keep_network() {
        let mut r = Resolver::new(MemoryLocation::new("#/kusama"), MemoryStore::new());
        r.on_data_loaded(&chains());
        r.set_view_params(Route {
            network: None,
            tab: Some(crate::view::Tab::Metadata),
            qr: Some(1),
        });
        assert_eq!(r.location().fragment(), "#/kusama?tab=metadata&qr=1");
        assert!(!r.on_navigation());
    }
}
