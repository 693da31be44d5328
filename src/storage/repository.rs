//! Progress store: processed links and the running question counter
//!
//! The pipeline only talks to the [`ProgressStore`] trait, so the backing
//! store can be swapped without touching orchestration code.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │      Pipeline Orchestrator   │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │      ProgressStore trait     │
//! └──────────────────────────────┘
//!          │              │
//!          ▼              ▼
//! ┌────────────────┐ ┌────────────────┐
//! │     SQLite     │ │     Memory     │
//! └────────────────┘ └────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use quizharvest::storage::{ProgressStore, SqliteProgressStore};
//!
//! let store = SqliteProgressStore::new("data/progress.db")?;
//! store.maybe_reset(chrono::Local::now().date_naive())?;
//! let counter = store.get_counter()?;
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::models::StoreStats;
use crate::utils::error::StoreError;

/// Key of the running question counter
pub const COUNTER_KEY: &str = "last_question_count";

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Store Trait
// ============================================================================

/// Persistent progress for incremental runs
///
/// Each call is atomic on its own; there are no cross-call transactions.
pub trait ProgressStore: Send + Sync {
    /// All URLs that have produced questions in earlier runs
    fn load_processed_urls(&self) -> StoreResult<HashSet<String>>;

    /// Record a URL as processed (idempotent)
    fn mark_processed(&self, url: &str) -> StoreResult<()>;

    /// Running question counter, 0 if never set
    fn get_counter(&self) -> StoreResult<u64>;

    /// Overwrite the running question counter
    fn set_counter(&self, value: u64) -> StoreResult<()>;

    /// Progress snapshot
    fn stats(&self) -> StoreResult<StoreStats>;

    /// Reset the counter on the first day of a month
    ///
    /// Returns `true` when the reset was applied. Processed links are left
    /// untouched.
    fn maybe_reset(&self, today: NaiveDate) -> StoreResult<bool> {
        if today.day() == 1 {
            self.set_counter(0)?;
            tracing::info!(%today, "Reset question count to 0 for the new month");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn url_hash(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

fn parse_counter(value: &str) -> StoreResult<u64> {
    value.trim().parse().map_err(|_| StoreError::CorruptValue {
        key: COUNTER_KEY.to_string(),
        value: value.to_string(),
    })
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of ProgressStore
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection.
pub struct SqliteProgressStore {
    conn: Mutex<Connection>,
}

impl SqliteProgressStore {
    /// Open (or create) a store at `path`
    pub fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "Progress store initialized");
        Ok(store)
    }

    /// Create in-memory store (for testing and dry runs)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS processed_links (
                    url TEXT PRIMARY KEY,
                    url_hash TEXT NOT NULL,
                    processed_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_processed_links_hash
                    ON processed_links(url_hash);

                CREATE TABLE IF NOT EXISTS counters (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
        )?;

        Ok(())
    }
}

impl ProgressStore for SqliteProgressStore {
    fn load_processed_urls(&self) -> StoreResult<HashSet<String>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT url FROM processed_links")?;
        let urls = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(urls)
    }

    fn mark_processed(&self, url: &str) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO processed_links (url, url_hash, processed_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(url) DO NOTHING
                "#,
            params![url, url_hash(url), now],
        )?;

        Ok(())
    }

    fn get_counter(&self) -> StoreResult<u64> {
        let conn = self.conn.lock()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM counters WHERE key = ?1",
                params![COUNTER_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value.as_deref().map(parse_counter).unwrap_or(Ok(0))
    }

    fn set_counter(&self, value: u64) -> StoreResult<()> {
        let conn = self.conn.lock()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO counters (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            params![COUNTER_KEY, value.to_string(), now],
        )?;

        Ok(())
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let processed_links: i64 = {
            let conn = self.conn.lock()?;
            conn.query_row("SELECT COUNT(*) FROM processed_links", [], |row| row.get(0))?
        };

        let last_processed_at: Option<String> = {
            let conn = self.conn.lock()?;
            conn.query_row("SELECT MAX(processed_at) FROM processed_links", [], |row| {
                row.get(0)
            })?
        };

        Ok(StoreStats {
            processed_links: processed_links as usize,
            counter: self.get_counter()?,
            last_processed_at: last_processed_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}

// ============================================================================
// In-memory Implementation
// ============================================================================

/// In-memory implementation of ProgressStore
///
/// Useful for tests and previews that must not touch the real store.
#[derive(Default)]
pub struct MemoryProgressStore {
    processed: RwLock<HashMap<String, DateTime<Utc>>>,
    counter: RwLock<Option<u64>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already processed URLs and a counter
    pub fn with_state<I, S>(urls: I, counter: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        Self {
            processed: RwLock::new(urls.into_iter().map(|u| (u.into(), now)).collect()),
            counter: RwLock::new(Some(counter)),
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load_processed_urls(&self) -> StoreResult<HashSet<String>> {
        Ok(self.processed.read()?.keys().cloned().collect())
    }

    fn mark_processed(&self, url: &str) -> StoreResult<()> {
        self.processed
            .write()?
            .entry(url.to_string())
            .or_insert_with(Utc::now);
        Ok(())
    }

    fn get_counter(&self) -> StoreResult<u64> {
        Ok(self.counter.read()?.unwrap_or(0))
    }

    fn set_counter(&self, value: u64) -> StoreResult<()> {
        *self.counter.write()? = Some(value);
        Ok(())
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let processed = self.processed.read()?;
        Ok(StoreStats {
            processed_links: processed.len(),
            counter: self.counter.read()?.unwrap_or(0),
            last_processed_at: processed.values().max().copied(),
        })
    }
}

// ============================================================================
// Shared Store Types
// ============================================================================

/// Thread-safe shared store handle
pub type SharedProgressStore = Arc<dyn ProgressStore>;

/// Create a shared SQLite store
pub fn create_sqlite_store(path: impl AsRef<Path>) -> StoreResult<SharedProgressStore> {
    Ok(Arc::new(SqliteProgressStore::new(path)?))
}

// ============================================================================
// Tests
// ============================================================================
