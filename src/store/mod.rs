//! Persistent key-value store for the proxy configuration.
//!
//! The deployed system keeps its state in a hosted KV namespace; here the
//! same contract is a single JSON file: a flat map of string keys to raw
//! JSON strings, loaded at open and rewritten on every put. Last write wins,
//! no versioning, no transactions. `current_config` and `config_history`
//! are independent keys and can diverge if one write fails (documented gap,
//! see DESIGN.md).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Store key holding the active upstream target.
pub const CURRENT_CONFIG_KEY: &str = "current_config";
/// Store key holding the save history.
pub const CONFIG_HISTORY_KEY: &str = "config_history";
/// Maximum retained history entries; older ones are dropped.
pub const MAX_HISTORY: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One saved proxy target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRecord {
    pub url: String,
    /// RFC 3339 timestamp of the save.
    pub timestamp: String,
}

/// File-backed string→string store.
///
/// Values are cached in memory behind an RwLock; every put/delete rewrites
/// the whole file while holding the write guard, so writes from one process
/// are serialized. An unreadable or unparsable file degrades to an empty
/// store rather than failing startup.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    cells: RwLock<HashMap<String, String>>,
}

impl KvStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cells = match Self::load(&path) {
            Some(map) => map,
            None => HashMap::new(),
        };
        Self {
            path,
            cells: RwLock::new(cells),
        }
    }

    fn load(path: &Path) -> Option<HashMap<String, String>> {
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => Some(map),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "state file unparsable, starting empty");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state file unreadable, starting empty");
                None
            }
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.cells.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut cells = self.cells.write().await;
        cells.insert(key.to_string(), value);
        self.persist(&cells)
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut cells = self.cells.write().await;
        cells.remove(key);
        self.persist(&cells)
    }

    fn persist(&self, cells: &HashMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(cells)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Typed wrapper over [`KvStore`] for the proxy's two keys.
#[derive(Debug)]
pub struct ConfigStore {
    kv: KvStore,
    /// Serializes the read-modify-write on the history list within this
    /// process. Concurrent writers on other processes sharing the file still
    /// race (last writer wins).
    save_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            kv: KvStore::open(path),
            save_lock: Mutex::new(()),
        }
    }

    /// Active target, if one was saved and still parses.
    pub async fn current(&self) -> Option<UpstreamRecord> {
        let raw = self.kv.get(CURRENT_CONFIG_KEY).await?;
        serde_json::from_str(&raw).ok()
    }

    /// Saved targets, newest first. Unparsable history reads as empty.
    pub async fn history(&self) -> Vec<UpstreamRecord> {
        match self.kv.get(CONFIG_HISTORY_KEY).await {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Save a new target: overwrite `current_config`, prepend to
    /// `config_history`, truncate to [`MAX_HISTORY`].
    pub async fn save(&self, url: &str) -> Result<UpstreamRecord, StoreError> {
        let _guard = self.save_lock.lock().await;

        let record = UpstreamRecord {
            url: url.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        self.kv
            .put(CURRENT_CONFIG_KEY, serde_json::to_string(&record)?)
            .await?;

        let mut history = self.history().await;
        history.insert(0, record.clone());
        history.truncate(MAX_HISTORY);
        self.kv
            .put(CONFIG_HISTORY_KEY, serde_json::to_string(&history)?)
            .await?;

        Ok(record)
    }

    /// Drop the active target so passthrough reverts to the built-in default.
    pub async fn delete_current(&self) -> Result<(), StoreError> {
        self.kv.delete(CURRENT_CONFIG_KEY).await
    }

    /// Drop the whole history.
    pub async fn clear_history(&self) -> Result<(), StoreError> {
        self.kv.delete(CONFIG_HISTORY_KEY).await
    }

    /// Fallback chain: the saved target when present and readable, otherwise
    /// `default`. The boolean reports which branch fired so callers (and
    /// tests) can tell.
    pub async fn resolve_target(&self, default: &str) -> (String, bool) {
        match self.current().await {
            Some(record) => (record.url, false),
            None => (default.to_string(), true),
        }
    }
}
