//! Metadata Portal - chain specs and metadata QR codes per network
//!
//! This library holds everything both front ends share: the `data.json`
//! model, the active-network resolver, URL routing and the view derivation.
//!
//! ## Architecture
//!
//! The portal is built to work in two modes:
//! - **Native**: Terminal UI using crossterm and ratatui (`portal` binary)
//! - **Web**: DOM front end driven through wasm-bindgen (`portal-web-dom` binary)
//!
//! Browser globals are reached only through two ports, [`router::LocationPort`]
//! and [`storage::PersistencePort`], so the selection logic runs unchanged in
//! tests, in the terminal and in the page.
//!
//! ## Usage
//!
//! For native builds:
//! ```bash
//! cargo run -- --data ./data.json kusama
//! ```
//!
//! For web builds:
//! ```bash
//! cargo build --bin portal-web-dom --target wasm32-unknown-unknown --no-default-features --features dom-web
//! ```

// Data model and loading
pub mod data;
pub mod error;
pub mod types;

// Selection, routing and persistence
pub mod resolver;
pub mod router;
pub mod storage;

// Presentation
pub mod theme;
pub mod view;

pub mod app;
pub mod ui;

// UI snapshot types for DOM-based rendering (all platforms)
pub mod ui_snapshot;

pub mod constants;

#[cfg(feature = "native")]
pub mod config;

// Platform abstraction layer
pub mod platform;

// Re-export commonly used types
pub use app::PortalApp;
pub use error::PortalError;
pub use resolver::{resolve, ChoiceSource, Resolution, Resolver};
pub use types::{ChainSpec, Chains};
