use crate::config::EngineConfig;
use crate::engine::{Collaborators, DrawEngine};
use crate::error::Result;
use crate::storage::{DrawHistory, DrawStore, SqliteDrawStore, Storage};
use crate::types::{
    CreateDrawRequest, DrawPage, DrawReceipt, HistoryEntry, VerificationReport, VerifyRequest,
};
use crate::verifier::Verifier;
use std::path::Path;
use std::sync::Arc;

pub const DB_FILE: &str = "fairdraw.db";

/// Production wiring over a data directory: SQLite store, OS randomness,
/// SHA-256 commitments and base-58 keys.
pub struct DrawService {
    engine: DrawEngine,
    verifier: Verifier,
    history: Arc<dyn DrawHistory>,
}

impl DrawService {
    pub async fn open(data_dir: &Path, config: EngineConfig) -> Result<Self> {
        let storage = Arc::new(Storage::new(&data_dir.join(DB_FILE)).await?);
        let store = Arc::new(SqliteDrawStore::new(storage));
        Self::with_parts(Collaborators::default(), store, config)
    }

    /// Wire a service over any store that also keeps history.
    pub fn with_parts<S>(parts: Collaborators, store: Arc<S>, config: EngineConfig) -> Result<Self>
    where
        S: DrawStore + DrawHistory + 'static,
    {
        let verifier = Verifier::new(parts.commitment.clone(), parts.mapper.clone(), store.clone());
        let engine = DrawEngine::new(parts, store.clone(), config)?;

        Ok(Self {
            engine,
            verifier,
            history: store,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub async fn create_draw(&self, request: &CreateDrawRequest) -> Result<DrawReceipt> {
        let draw = self.engine.create_draw(request).await?;
        Ok(draw.receipt())
    }

    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerificationReport> {
        self.verifier.verify(request).await
    }

    pub async fn history(&self, owner: &str, limit: u32) -> Result<Vec<HistoryEntry>> {
        let draws = self.history.list_by_owner(owner, limit).await?;
        Ok(draws.iter().map(|d| d.history_entry()).collect())
    }

    pub async fn list_page(&self, page: u32, per_page: u32) -> Result<DrawPage> {
        self.history.list_page(page, per_page).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.history.delete(id).await
    }

    pub async fn purge(&self) -> Result<u64> {
        self.history.purge().await
    }
}
