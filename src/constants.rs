//! Application constants
//!
//! Layout limits, timing and user-facing strings shared by the front ends.

/// Default SQLite file for the persisted choice store.
pub const DEFAULT_STATE_DB: &str = "portal_state.db";

/// UI layout and display constants
pub mod ui {
    /// Minimum terminal width in columns for usable display
    pub const MIN_WIDTH: u16 = 60;

    /// Minimum terminal height in rows for usable display
    pub const MIN_HEIGHT: u16 = 15;

    /// Sidebar width (columns) in the wide layout
    pub const SIDEBAR_WIDTH: u16 = 28;

    /// Below this width the sidebar becomes an overlay toggled with `s`.
    pub const NARROW_THRESHOLD: u16 = 90;

    pub const DEFAULT_FPS: u32 = 30;
}

/// Application state and behavior constants
pub mod app {
    /// Duration to show toast notifications (seconds)
    pub const TOAST_DURATION_SECS: u64 = 2;
}

/// User-facing message strings
pub mod messages {
    pub const BANNER: &str =
        "Polkadot Vault users: scan the chain spec first, then keep metadata up to date.";

    pub const COPY_GENESIS: &str = "Copied genesis hash";
    pub const COPY_RPC: &str = "Copied RPC endpoint";
    pub const COPY_LINK: &str = "Copied link";
    pub const COPY_HASH: &str = "Copied source hash";

    /// Generic copy success message (web, where the field is obvious)
    pub const COPY_GENERIC: &str = "Copied";

    pub const COPY_FAILED: &str = "Copy failed";
    pub const NOTHING_TO_COPY: &str = "Nothing to copy";
}
