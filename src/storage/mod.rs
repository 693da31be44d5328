//! Persistence of run progress
//!
//! Processed quiz links and the running question counter live in SQLite;
//! an in-memory store backs tests and dry runs.

pub mod repository;

pub use repository::{
    create_sqlite_store, MemoryProgressStore, ProgressStore, SharedProgressStore,
    SqliteProgressStore, StoreResult, COUNTER_KEY,
};
