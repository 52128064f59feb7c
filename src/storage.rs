//! Persisted choice store.
//!
//! A tiny key/value surface that survives restarts. The portal only keeps two
//! keys in it: the last network the user looked at and whether the download
//! banner was dismissed. Values are never validated here; the resolver decides
//! whether a stored network still exists.

use std::collections::HashMap;

use crate::error::Result;

/// Last network the user viewed.
pub const CHOSEN_NETWORK_KEY: &str = "chosenNetwork";

/// `"true"` once the download banner has been closed.
pub const HIDE_BANNER_KEY: &str = "hideBanner";

/// Key/value persistence capability injected into the resolver.
pub trait PersistencePort {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<P: PersistencePort + ?Sized> PersistencePort for Box<P> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// Non-persistent store, used by tests and when no real backend is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl PersistencePort for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// SQLite-backed store for the terminal viewer.
#[cfg(feature = "native")]
pub struct SqliteStore {
    conn: rusqlite::Connection,
}

#[cfg(feature = "native")]
impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::error::PortalError::Storage(format!("{path}: {e}")))?;
            }
        }
        let conn = rusqlite::Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(rusqlite::Connection::open_in_memory()?)
    }

    fn init(conn: rusqlite::Connection) -> Result<Self> {
        conn.pragma_update(None, "busy_timeout", 250)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv(
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv(key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(feature = "native")]
impl PersistencePort for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read(key) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[store] read {key} failed: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.write(key, value) {
            log::warn!("[store] write {key} failed: {e}");
        }
    }
}
