//! View derivation for one network.
//!
//! Everything here is a pure function of a [`ChainSpec`] plus the small view
//! state (tab, QR index). Both front ends render from [`NetworkView`], so a
//! network switch can never show fields left over from the previous one.

use serde::{Deserialize, Serialize};

use crate::theme::ChainColor;
use crate::types::{ChainSpec, Chains, MetadataSource, QrInfo};

/// The two panels of a network card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Chain,
    Metadata,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Chain, Tab::Metadata];

    pub fn parse(s: &str) -> Option<Tab> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chain" | "chains" | "specs" | "chain-specs" | "0" => Some(Tab::Chain),
            "metadata" | "meta" | "1" => Some(Tab::Metadata),
            _ => None,
        }
    }

    pub fn as_query(self) -> &'static str {
        match self {
            Tab::Chain => "chain",
            Tab::Metadata => "metadata",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chain => "Chain Specs",
            Tab::Metadata => "Metadata",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Chain => 0,
            Tab::Metadata => 1,
        }
    }

    pub fn toggle(self) -> Tab {
        match self {
            Tab::Chain => Tab::Metadata,
            Tab::Metadata => Tab::Chain,
        }
    }
}

/// How a row value should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Text,
    /// Long hex value, shortened on screen, copyable.
    Hash,
    /// Color swatch + value.
    Color,
    Link,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub label: &'static str,
    pub value: String,
    pub kind: RowKind,
    pub full_width: bool,
}

impl Row {
    fn new(label: &'static str, value: impl Into<String>, kind: RowKind) -> Self {
        Row {
            label,
            value: value.into(),
            kind,
            full_width: false,
        }
    }

    fn wide(mut self) -> Self {
        self.full_width = true;
        self
    }
}

/// Signed/unsigned badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "signer", rename_all = "lowercase")]
pub enum Badge {
    Signed(String),
    Unsigned,
}

impl Badge {
    pub fn of(qr: &QrInfo) -> Badge {
        match qr.signed_by.as_deref() {
            Some(signer) if !signer.is_empty() => Badge::Signed(signer.to_string()),
            _ => Badge::Unsigned,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Badge::Signed(signer) => format!("Signed by {signer}"),
            Badge::Unsigned => "Unsigned".to_string(),
        }
    }
}

/// One selectable metadata QR (current or pending).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOption {
    pub label: String,
    pub version: u32,
    pub path: String,
    pub badge: Badge,
    pub pending: bool,
    pub source_rows: Vec<Row>,
}

/// Metadata panel state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPanel {
    pub version: u32,
    /// No signed metadata is published for the live version.
    pub out_of_date: bool,
    pub options: Vec<QrOption>,
    /// Index into `options`, `None` when there is nothing to show.
    pub selected: Option<usize>,
}

impl MetadataPanel {
    pub fn selected_option(&self) -> Option<&QrOption> {
        self.selected.and_then(|i| self.options.get(i))
    }
}

/// Everything needed to draw a network card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkView {
    pub identifier: String,
    pub title: String,
    pub color: String,
    pub color_css: String,
    /// Site-relative logo asset, if the network has one.
    pub logo: Option<String>,
    pub relay_chain: Option<String>,
    pub spec_rows: Vec<Row>,
    pub specs_qr_path: String,
    pub specs_badge: Badge,
    pub latest_metadata_path: Option<String>,
    pub metadata: MetadataPanel,
    /// "Metadata N is available!" prompt.
    pub next_prompt: Option<String>,
}

impl NetworkView {
    pub fn from_spec(spec: &ChainSpec, qr_index: usize) -> Self {
        let metadata = metadata_panel(spec, qr_index);
        let next_prompt = spec
            .pending_metadata()
            .map(|(v, _)| format!("Metadata {v} is available!"));

        NetworkView {
            identifier: spec.identifier.clone(),
            title: capitalize_first(&spec.title),
            color: spec.color.clone(),
            color_css: ChainColor::parse(&spec.color).css_background(),
            logo: spec.logo.clone(),
            relay_chain: spec.relay_chain.clone(),
            spec_rows: spec_rows(spec),
            specs_qr_path: spec.specs_qr.path.clone(),
            specs_badge: Badge::of(&spec.specs_qr),
            latest_metadata_path: spec.latest_metadata.clone(),
            metadata,
            next_prompt,
        }
    }
}

fn spec_rows(spec: &ChainSpec) -> Vec<Row> {
    let mut rows = vec![
        Row::new("RPC endpoint", &spec.rpc_endpoint, RowKind::Text).wide(),
        Row::new("Genesis hash", &spec.genesis_hash, RowKind::Hash),
        Row::new("Address prefix", spec.address_prefix.to_string(), RowKind::Text),
        Row::new("Color", &spec.color, RowKind::Color),
        Row::new("Unit", &spec.unit, RowKind::Text),
    ];
    if let Some(decimals) = spec.decimals {
        rows.push(Row::new("Decimals", decimals.to_string(), RowKind::Text));
    }
    if let Some(relay) = spec.relay_chain.as_deref() {
        rows.push(Row::new("Relay chain", capitalize_first(relay), RowKind::Text));
    }
    rows
}

fn source_rows(source: Option<&MetadataSource>) -> Vec<Row> {
    match source {
        Some(MetadataSource::Wasm { github_repo, hash }) => vec![
            Row::new(
                "Metadata source",
                format!("https://github.com/{github_repo}/releases"),
                RowKind::Link,
            ),
            Row::new("Blake2-256 hash", hash, RowKind::Hash),
        ],
        Some(MetadataSource::Rpc { block }) => {
            vec![Row::new("Source block", block, RowKind::Hash).wide()]
        }
        None => Vec::new(),
    }
}

/// Current + pending metadata QRs, in display order.
pub fn metadata_options(spec: &ChainSpec) -> Vec<QrOption> {
    let mut options = Vec::with_capacity(2);
    if let Some(qr) = spec.metadata_qr.as_ref() {
        options.push(QrOption {
            label: format!("Current: #{}", spec.metadata_version),
            version: spec.metadata_version,
            path: qr.path.clone(),
            badge: Badge::of(qr),
            pending: false,
            source_rows: source_rows(qr.source.as_ref()),
        });
    }
    if let Some((version, qr)) = spec.pending_metadata() {
        options.push(QrOption {
            label: format!("Next #{version}"),
            version,
            path: qr.path.clone(),
            badge: Badge::of(qr),
            pending: true,
            source_rows: source_rows(qr.source.as_ref()),
        });
    }
    options
}

/// Clamp a requested QR index to what this network publishes.
pub fn clamp_qr_index(spec: &ChainSpec, requested: usize) -> usize {
    let n = metadata_options(spec).len();
    if n == 0 {
        0
    } else {
        requested.min(n - 1)
    }
}

fn metadata_panel(spec: &ChainSpec, qr_index: usize) -> MetadataPanel {
    let options = metadata_options(spec);
    let selected = if options.is_empty() {
        None
    } else {
        Some(qr_index.min(options.len() - 1))
    };
    MetadataPanel {
        version: spec.metadata_version,
        out_of_date: !spec.has_published_metadata(),
        options,
        selected,
    }
}

/// Sidebar search: case-insensitive substring over identifier and title.
/// An empty query keeps every network, in data order.
pub fn filter_networks<'a>(chains: &'a Chains, query: &str) -> Vec<&'a str> {
    let q = query.trim().to_lowercase();
    chains
        .iter()
        .filter(|(id, spec)| {
            q.is_empty() || id.to_lowercase().contains(&q) || spec.title.to_lowercase().contains(&q)
        })
        .map(|(id, _)| id.as_str())
        .collect()
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Shorten a long hash for narrow displays: `0x91b1…90c3`.
pub fn short_hash(hash: &str) -> String {
    if hash.chars().count() <= 14 {
        return hash.to_string();
    }
    let head: String = hash.chars().take(6).collect();
    let tail: String = hash.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr(path: &str, signer: Option<&str>) -> QrInfo {
        QrInfo {
            path: path.into(),
            signed_by: signer.map(String::from),
            source: None,
        }
    }

    fn spec() -> ChainSpec {
        ChainSpec {
            identifier: "kusama".into(),
            title: "kusama".into(),
            color: "#000000".into(),
            rpc_endpoint: "wss://kusama-rpc.polkadot.io".into(),
            genesis_hash: "0xb0a8d493285c2df73290dfb7e61f870f17b41801197a149ca93654499ea3dafe".into(),
            unit: "KSM".into(),
            address_prefix: 2,
            decimals: Some(12),
            logo: None,
            metadata_version: 9430,
            metadata_qr: Some(QrInfo {
                path: "qr/kusama_metadata_9430.apng".into(),
                signed_by: Some("parity".into()),
                source: Some(MetadataSource::Rpc { block: "0xfeed".into() }),
            }),
            next_metadata_version: None,
            next_metadata_qr: None,
            specs_qr: qr("qr/kusama_specs.png", Some("parity")),
            latest_metadata: Some("qr/kusama_metadata_9430.apng".into()),
            relay_chain: None,
        }
    }

    #[test]
    fn tab_parsing() {
        assert_eq!(Tab::parse("metadata"), Some(Tab::Metadata));
        assert_eq!(Tab::parse("Chain"), Some(Tab::Chain));
        assert_eq!(Tab::parse("1"), Some(Tab::Metadata));
        assert_eq!(Tab::parse("qr"), None);
        assert_eq!(Tab::Chain.toggle(), Tab::Metadata);
    }

    #[test]
    fn view_for_published_network() {
        let view = NetworkView::from_spec(&spec(), 0);
        assert_eq!(view.title, "Kusama");
        assert!(!view.metadata.out_of_date);
        assert_eq!(view.metadata.options.len(), 1);
        let current = view.metadata.selected_option().unwrap();
        assert_eq!(current.label, "Current: #9430");
        assert_eq!(current.badge.label(), "Signed by parity");
        assert_eq!(current.source_rows[0].label, "Source block");
        assert!(view.next_prompt.is_none());
        assert!(view.spec_rows.iter().any(|r| r.label == "Decimals" && r.value == "12"));
        assert_eq!(view.logo, None);

        let mut s = spec();
        s.logo = Some("/logos/kusama.svg".into());
        assert_eq!(NetworkView::from_spec(&s, 0).logo.as_deref(), Some("/logos/kusama.svg"));
    }

    #[test]
    fn missing_metadata_is_out_of_date_not_a_panic() {
        let mut s = spec();
        s.metadata_qr = None;
        let view = NetworkView::from_spec(&s, 3);
        assert!(view.metadata.out_of_date);
        assert!(view.metadata.options.is_empty());
        assert!(view.metadata.selected_option().is_none());
        assert_eq!(clamp_qr_index(&s, 3), 0);
    }

    #[test]
    fn pending_metadata_adds_option_and_prompt() {
        let mut s = spec();
        s.next_metadata_version = Some(9440);
        s.next_metadata_qr = Some(qr("qr/kusama_metadata_9440.apng", None));
        let view = NetworkView::from_spec(&s, 5);
        assert_eq!(view.metadata.selected, Some(1));
        let next = view.metadata.selected_option().unwrap();
        assert_eq!(next.label, "Next #9440");
        assert!(next.pending);
        assert_eq!(next.badge, Badge::Unsigned);
        assert_eq!(view.next_prompt.as_deref(), Some("Metadata 9440 is available!"));
    }

    #[test]
    fn wasm_source_links_to_releases() {
        let rows = source_rows(Some(&MetadataSource::Wasm {
            github_repo: "paritytech/polkadot".into(),
            hash: "0x12".into(),
        }));
        assert_eq!(rows[0].value, "https://github.com/paritytech/polkadot/releases");
        assert_eq!(rows[1].label, "Blake2-256 hash");
    }

    #[test]
    fn search_matches_identifier_and_title() {
        let mut chains = Chains::new();
        let mut k = spec();
        chains.insert("kusama".into(), k.clone());
        k.identifier = "statemine".into();
        k.title = "Kusama Asset Hub".into();
        chains.insert("statemine".into(), k);

        assert_eq!(filter_networks(&chains, ""), ["kusama", "statemine"]);
        assert_eq!(filter_networks(&chains, "STATE"), ["statemine"]);
        assert_eq!(filter_networks(&chains, "asset"), ["statemine"]);
        assert!(filter_networks(&chains, "westend").is_empty());
    }

    #[test]
    fn shortens_hashes() {
        assert_eq!(short_hash("0x1234"), "0x1234");
        assert_eq!(
            short_hash("0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3"),
            "0x91b1…90c3"
        );
    }
}
