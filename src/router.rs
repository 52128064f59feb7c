//! Hash router for the portal
//!
//! The address bar is the shareable state of the portal. It carries one
//! network token in the fragment path and optional view parameters in the
//! fragment query:
//!
//! - `#/polkadot` - network only
//! - `#/kusama?tab=metadata` - network + active tab
//! - `#/kusama?tab=metadata&qr=1` - network + tab + metadata QR index
//!
//! ## Robust Parsing
//!
//! - Leading `#`, `#/`, `/` are all optional: `#polkadot`, `/polkadot`, `polkadot`
//! - Repeated slashes are collapsed: `#//polkadot`
//! - Percent-encoded tokens are decoded: `#/my%20chain`
//! - Unknown query keys are ignored, bad values drop only that parameter
//!
//! The network token is returned exactly as typed. Case is not folded here.

use crate::view::Tab;

/// Parsed portal location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub network: Option<String>,
    pub tab: Option<Tab>,
    pub qr: Option<usize>,
}

impl Route {
    pub fn network(id: &str) -> Self {
        Route {
            network: Some(id.to_string()),
            ..Default::default()
        }
    }
}

/// Browser location capability injected into the resolver.
///
/// `replace_fragment` must not add a history entry and must not be reported
/// back as a navigation.
pub trait LocationPort {
    /// Current fragment including the leading `#`, or empty.
    fn fragment(&self) -> String;
    fn replace_fragment(&mut self, fragment: &str);

    /// Link that reopens the current view. Without a known page address
    /// this is the bare fragment.
    fn share_url(&self) -> String {
        self.fragment()
    }
}

impl<L: LocationPort + ?Sized> LocationPort for Box<L> {
    fn fragment(&self) -> String {
        (**self).fragment()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        (**self).replace_fragment(fragment)
    }

    fn share_url(&self) -> String {
        (**self).share_url()
    }
}

/// In-process location: deep-link argument for the terminal viewer, and the
/// browser stand-in for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocation {
    /// Page address the fragment is appended to when sharing.
    base: String,
    fragment: String,
    /// Number of in-place rewrites performed so far.
    pub replacements: usize,
}

impl MemoryLocation {
    pub fn new(fragment: &str) -> Self {
        Self::with_base("", fragment)
    }

    /// Location on a known page, e.g. `https://metadata.parity.io/`.
    pub fn with_base(base: &str, fragment: &str) -> Self {
        Self {
            base: base.split('#').next().unwrap_or_default().to_string(),
            fragment: fragment.to_string(),
            replacements: 0,
        }
    }

    /// Simulate a user-driven navigation (typing a URL, back/forward).
    pub fn navigate(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
    }
}

impl LocationPort for MemoryLocation {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn replace_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
        self.replacements += 1;
    }

    fn share_url(&self) -> String {
        format!("{}{}", self.base, self.fragment)
    }
}

/// Split `raw` at the first `?`.
#[inline]
fn split_query(s: &str) -> (&str, &str) {
    match s.find('?') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// Parse a fragment (or a full URL containing one).
pub fn parse(raw: &str) -> Route {
    let s = raw.trim();
    // Full URL: only the fragment matters.
    let s = match s.find('#') {
        Some(i) => &s[i + 1..],
        None => s,
    };
    let s = s.trim_start_matches('/');

    let (path, query) = split_query(s);
    let network = path
        .split('/')
        .find(|seg| !seg.is_empty())
        .map(decode)
        .filter(|n| !n.trim().is_empty());

    let mut route = Route {
        network,
        ..Default::default()
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        match k.to_ascii_lowercase().as_str() {
            "tab" => route.tab = Tab::parse(&decode(v)),
            "qr" => route.qr = decode(v).parse::<usize>().ok(),
            _ => log::debug!("[router] ignoring query key {k:?}"),
        }
    }
    route
}

/// Format a route as a fragment, `#/` prefixed.
pub fn format(route: &Route) -> String {
    let mut out = String::from("#/");
    if let Some(network) = route.network.as_deref() {
        out.push_str(&urlencoding::encode(network));
    }

    let mut params = Vec::with_capacity(2);
    if let Some(tab) = route.tab {
        params.push(format!("tab={}", tab.as_query()));
    }
    if let Some(qr) = route.qr {
        params.push(format!("qr={qr}"));
    }
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    out
}
