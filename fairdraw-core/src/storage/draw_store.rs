use crate::error::Result;
use crate::storage::{check_page, DrawHistory, DrawStore, InsertOutcome, Storage};
use crate::types::{Draw, DrawPage};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

const DRAW_COLUMNS: &str =
    "id, owner, min_value, max_value, result, secret, commitment_hash, created_at";

/// SQLite-backed draw store.
pub struct SqliteDrawStore {
    storage: Arc<Storage>,
}

impl SqliteDrawStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }
}

// Fixed-width nanosecond timestamps sort correctly as text.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let created_at: String = row.get(7)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Draw::restore(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        created_at,
    ))
}

#[async_trait]
impl DrawStore for SqliteDrawStore {
    async fn insert(&self, draw: &Draw) -> Result<InsertOutcome> {
        let conn = self.storage.get_connection().await;

        let inserted = conn.execute(
            "INSERT INTO draws (id, owner, min_value, max_value, result, secret, commitment_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                draw.id(),
                draw.owner(),
                draw.min(),
                draw.max(),
                draw.result(),
                draw.secret(),
                draw.commitment(),
                format_timestamp(draw.created_at()),
            ],
        );

        match inserted {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Ok(InsertOutcome::DuplicateKey)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Draw>> {
        let conn = self.storage.get_connection().await;

        let draw = conn
            .query_row(
                &format!("SELECT {} FROM draws WHERE id = ?1", DRAW_COLUMNS),
                params![id],
                row_to_draw,
            )
            .optional()?;

        Ok(draw)
    }
}

#[async_trait]
impl DrawHistory for SqliteDrawStore {
    async fn list_by_owner(&self, owner: &str, limit: u32) -> Result<Vec<Draw>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM draws WHERE owner = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            DRAW_COLUMNS
        ))?;

        let draws = stmt
            .query_map(params![owner, limit], row_to_draw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(draws)
    }

    async fn list_page(&self, page: u32, per_page: u32) -> Result<DrawPage> {
        check_page(page, per_page)?;
        let conn = self.storage.get_connection().await;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
        let offset = i64::from(page - 1) * i64::from(per_page);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM draws
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
            DRAW_COLUMNS
        ))?;

        let draws = stmt
            .query_map(params![per_page, offset], row_to_draw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(DrawPage::new(draws, page, per_page, total.max(0) as u64))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.storage.get_connection().await;
        let removed = conn.execute("DELETE FROM draws WHERE id = ?1", params![id])?;

        if removed > 0 {
            tracing::info!("Deleted draw {}", id);
        }
        Ok(removed > 0)
    }

    async fn purge(&self) -> Result<u64> {
        let conn = self.storage.get_connection().await;
        let removed = conn.execute("DELETE FROM draws", [])?;

        tracing::warn!("Purged {} draws", removed);
        Ok(removed as u64)
    }
}
