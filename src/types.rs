//! Data model for the portal's `data.json`.
//!
//! The file is a JSON object keyed by network identifier. Key order is
//! significant (it is the sidebar order and the default selection), so the
//! map is an [`IndexMap`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered map from network identifier to its spec.
pub type Chains = IndexMap<String, ChainSpec>;

/// Provenance of a metadata QR artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetadataSource {
    /// Built from a runtime Wasm blob published in a GitHub release.
    Wasm { github_repo: String, hash: String },
    /// Extracted from a live node via RPC at the given block.
    Rpc { block: String },
}

/// A QR image published by the data-collection step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrInfo {
    /// Asset path relative to the site root.
    pub path: String,
    #[serde(default)]
    pub signed_by: Option<String>,
    #[serde(default)]
    pub source: Option<MetadataSource>,
}

impl QrInfo {
    pub fn is_signed(&self) -> bool {
        self.signed_by.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// One network entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSpec {
    /// Map key; filled in by the loader, never read from the entry itself.
    #[serde(skip_deserializing, default)]
    pub identifier: String,
    pub title: String,
    pub color: String,
    pub rpc_endpoint: String,
    pub genesis_hash: String,
    pub unit: String,
    #[serde(rename = "base58prefix")]
    pub address_prefix: u16,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub logo: Option<String>,

    #[serde(alias = "liveMetaVersion")]
    pub metadata_version: u32,
    #[serde(default)]
    pub metadata_qr: Option<QrInfo>,
    #[serde(default)]
    pub next_metadata_version: Option<u32>,
    #[serde(default)]
    pub next_metadata_qr: Option<QrInfo>,
    pub specs_qr: QrInfo,

    /// Path of the newest metadata QR, signed or not.
    #[serde(default)]
    pub latest_metadata: Option<String>,
    #[serde(default)]
    pub relay_chain: Option<String>,
}

impl ChainSpec {
    /// Pending metadata artifact, only when it is actually newer than the
    /// live one.
    pub fn pending_metadata(&self) -> Option<(u32, &QrInfo)> {
        let version = self.next_metadata_version?;
        let qr = self.next_metadata_qr.as_ref()?;
        (version > self.metadata_version).then_some((version, qr))
    }

    pub fn has_published_metadata(&self) -> bool {
        self.metadata_qr.is_some()
    }
}
