//! Chain data loading (`data.json`).
//!
//! Loading is one-shot: no retries, no timeout. Any failure is reported as
//! [`PortalError::DataUnavailable`] and the caller renders an empty portal.

use crate::error::{PortalError, Result};
use crate::types::Chains;

/// Default location of the data file, relative to the site root.
pub const DEFAULT_DATA_PATH: &str = "data.json";

/// Where to read the data file from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// Local file (native builds).
    File(String),
    /// HTTP(S) resource.
    Url(String),
}

impl DataSource {
    /// Treat anything with an http(s) scheme as a URL, everything else as a path.
    pub fn detect(raw: &str) -> Self {
        let s = raw.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(s.to_string())
        }
    }

    pub fn describe(&self) -> &str {
        match self {
            DataSource::File(p) => p,
            DataSource::Url(u) => u,
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Parse a `data.json` document and enforce the map invariants.
pub fn parse_chains(json: &str) -> Result<Chains> {
    let raw: Chains = serde_json::from_str(json).map_err(|e| PortalError::data("data.json", e))?;
    Ok(normalize(raw))
}

/// Fill identifiers from keys, drop unusable entries and stale pending metadata.
fn normalize(raw: Chains) -> Chains {
    let mut out = Chains::with_capacity(raw.len());
    for (key, mut spec) in raw {
        if key.trim().is_empty() {
            log::warn!("[data] dropping network with empty identifier ({:?})", spec.title);
            continue;
        }
        spec.identifier = key.clone();

        let pending_ok = match (spec.next_metadata_version, spec.next_metadata_qr.as_ref()) {
            (None, None) => true,
            (Some(v), Some(_)) => v > spec.metadata_version,
            _ => false,
        };
        if !pending_ok {
            log::warn!(
                "[data] {key}: ignoring pending metadata {:?} (live version {})",
                spec.next_metadata_version,
                spec.metadata_version
            );
            spec.next_metadata_version = None;
            spec.next_metadata_qr = None;
        }
        out.insert(key, spec);
    }
    out
}

/// Read chain data from a local file.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_file(path: &str) -> Result<Chains> {
    let body = std::fs::read_to_string(path).map_err(|e| PortalError::data(path, e))?;
    parse_chains(&body).map_err(|e| relabel(e, path))
}

/// Fetch chain data over HTTP. `url` must be absolute.
pub async fn fetch_chains(url: &str) -> Result<Chains> {
    log::info!("[data] fetching {url}");
    let resp = reqwest::get(url).await.map_err(|e| PortalError::data(url, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(PortalError::data(url, format!("HTTP {status}")));
    }
    let body = resp.text().await.map_err(|e| PortalError::data(url, e))?;
    parse_chains(&body).map_err(|e| relabel(e, url))
}

/// Load from whichever source was configured.
pub async fn load(source: &DataSource) -> Result<Chains> {
    match source {
        #[cfg(not(target_arch = "wasm32"))]
        DataSource::File(path) => load_file(path),
        #[cfg(target_arch = "wasm32")]
        DataSource::File(path) => Err(PortalError::data(path, "local files are not readable in the browser")),
        DataSource::Url(url) => fetch_chains(url).await,
    }
}

fn relabel(e: PortalError, source_desc: &str) -> PortalError {
    match e {
        PortalError::DataUnavailable { reason, .. } => PortalError::data(source_desc, reason),
        other => other,
    }
}
