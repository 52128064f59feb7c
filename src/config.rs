use anyhow::{anyhow, Result};
use clap::Parser;

use crate::constants;
use crate::data::DataSource;
use crate::router::{self, Route};

/// Metadata Portal - per-network chain specs and metadata QR codes
///
/// Terminal front end. Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "portal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Metadata Portal for Polkadot Vault", long_about = None)]
pub struct CliArgs {
    /// Deep link to open, e.g. "#/kusama?tab=metadata" or just "kusama"
    pub deeplink: Option<String>,

    /// Chains data: a file path or an http(s) URL
    #[arg(short, long, env = "PORTAL_DATA")]
    pub data: Option<String>,

    /// SQLite file holding the persisted network choice and banner flag
    #[arg(long, env = "PORTAL_STATE_DB")]
    pub state_db: Option<String>,

    /// Network to open when no deep link is given
    #[arg(short, long, env = "PORTAL_NETWORK")]
    pub network: Option<String>,

    /// Public address of the portal page, used for copied links
    #[arg(long, env = "PORTAL_BASE_URL")]
    pub base_url: Option<String>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "PORTAL_FPS")]
    pub fps: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data: DataSource,
    pub state_db: String,
    /// Fragment the in-process location starts from ("" when none given).
    pub initial_fragment: String,
    /// Prefix for copied links ("" copies the bare fragment).
    pub base_url: String,
    pub render_fps: u32,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_data(raw: &str) -> Result<DataSource> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(anyhow!("PORTAL_DATA cannot be empty"));
    }
    if raw.contains("://") && !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(anyhow!("PORTAL_DATA URLs must start with http:// or https://"));
    }
    Ok(DataSource::detect(raw))
}

fn validate_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(anyhow!("PORTAL_BASE_URL must start with http:// or https://"));
    }
    Ok(raw.split('#').next().unwrap_or(raw).to_string())
}

/// A bare network id is accepted as shorthand for `#/<id>`.
fn normalize_deeplink(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        raw.to_string()
    } else if raw.starts_with('/') {
        format!("#{raw}")
    } else {
        format!("#/{raw}")
    }
}

/// Load configuration from CLI args and environment variables
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let data = validate_data(
        args.data
            .as_deref()
            .unwrap_or(crate::data::DEFAULT_DATA_PATH),
    )?;

    let state_db = args
        .state_db
        .unwrap_or_else(|| constants::DEFAULT_STATE_DB.to_string());

    let initial_fragment = match (args.deeplink, args.network) {
        (Some(link), _) => normalize_deeplink(&link),
        (None, Some(network)) if !network.trim().is_empty() => {
            router::format(&Route::network(network.trim()))
        }
        _ => String::new(),
    };

    let base_url = validate_base_url(args.base_url.as_deref().unwrap_or_default())?;

    let render_fps = validate_in_range(
        args.fps.unwrap_or(constants::ui::DEFAULT_FPS),
        1,
        120,
        "PORTAL_FPS",
    )?;

    Ok(Config {
        data,
        state_db,
        initial_fragment,
        base_url,
        render_fps,
    })
}

impl Config {
    pub fn print_summary(&self) {
        eprintln!("Metadata Portal Configuration:");
        eprintln!("  Data: {}", self.data);
        eprintln!("  State DB: {}", self.state_db);
        if !self.initial_fragment.is_empty() {
            eprintln!("  Deep link: {}", self.initial_fragment);
        }
        if !self.base_url.is_empty() {
            eprintln!("  Base URL: {}", self.base_url);
        }
        eprintln!("  Render FPS: {}", self.render_fps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = from_args(CliArgs::default()).unwrap();
        assert_eq!(cfg.data, DataSource::File("data.json".into()));
        assert_eq!(cfg.initial_fragment, "");
        assert_eq!(cfg.base_url, "");
        assert_eq!(cfg.render_fps, constants::ui::DEFAULT_FPS);
    }

    #[test]
    fn deeplink_beats_network_flag() {
        let cfg = from_args(CliArgs {
            deeplink: Some("westend?tab=metadata".into()),
            network: Some("kusama".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.initial_fragment, "#/westend?tab=metadata");

        let cfg = from_args(CliArgs {
            network: Some("kusama".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.initial_fragment, "#/kusama");
    }

    #[test]
    fn rejects_bad_values() {
        let err = from_args(CliArgs {
            fps: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("PORTAL_FPS"));

        assert!(from_args(CliArgs {
            data: Some("ftp://host/data.json".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn base_url_drops_fragment_and_rejects_other_schemes() {
        let cfg = from_args(CliArgs {
            base_url: Some("https://metadata.parity.io/#/kusama".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.base_url, "https://metadata.parity.io/");

        assert!(from_args(CliArgs {
            base_url: Some("metadata.parity.io".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn url_data_source() {
        let cfg = from_args(CliArgs {
            data: Some("https://example.org/data.json".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(cfg.data, DataSource::Url(_)));
    }
}
