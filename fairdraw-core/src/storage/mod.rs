pub mod draw_store;
pub mod memory;

pub use draw_store::SqliteDrawStore;
pub use memory::MemoryDrawStore;

use crate::error::{DrawError, Result};
use crate::types::{Draw, DrawPage};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

/// Outcome of an insert. A taken key is an expected outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateKey,
}

/// Persistence contract the engine and verifier rely on.
///
/// Draws are insert-once and read-only afterwards, so there is no update.
/// `insert` must be atomic on `id`: of two concurrent inserts with the same
/// key exactly one sees `Inserted`.
#[async_trait]
pub trait DrawStore: Send + Sync {
    async fn insert(&self, draw: &Draw) -> Result<InsertOutcome>;

    async fn get(&self, id: &str) -> Result<Option<Draw>>;
}

/// Listing and purge operations for account history and administration.
#[async_trait]
pub trait DrawHistory: Send + Sync {
    /// Draws of one owner, newest first.
    async fn list_by_owner(&self, owner: &str, limit: u32) -> Result<Vec<Draw>>;

    /// One 1-based page over all draws, newest first.
    async fn list_page(&self, page: u32, per_page: u32) -> Result<DrawPage>;

    /// Remove a single draw; false when the key is unknown.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Remove every draw and return how many were removed.
    async fn purge(&self) -> Result<u64>;
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        tracing::info!("Opened draw store at {}", db_path.display());
        Ok(storage)
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS draws (
                id TEXT PRIMARY KEY,
                owner TEXT,
                min_value INTEGER NOT NULL,
                max_value INTEGER NOT NULL,
                result INTEGER NOT NULL,
                secret TEXT NOT NULL,
                commitment_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_draws_owner ON draws (owner, created_at)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_draws_created_at ON draws (created_at)",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

pub(crate) fn check_page(page: u32, per_page: u32) -> Result<()> {
    if page == 0 {
        return Err(DrawError::invalid_input("Pages are numbered from 1"));
    }
    if per_page == 0 {
        return Err(DrawError::invalid_input("per_page must be greater than 0"));
    }
    Ok(())
}
