use crate::error::Result;
use crate::storage::{check_page, DrawHistory, DrawStore, InsertOutcome};
use crate::types::{Draw, DrawPage};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    draws: HashMap<String, (u64, Draw)>,
    next_seq: u64,
}

/// In-process draw store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryDrawStore {
    inner: RwLock<Inner>,
}

impl MemoryDrawStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite a stored draw in place, bypassing the insert-once contract.
    #[cfg(test)]
    pub(crate) fn tamper(&self, draw: Draw) {
        let mut inner = self.inner.write();
        if let Some(slot) = inner.draws.get_mut(draw.id()) {
            slot.1 = draw;
        }
    }

    // Newest first; insertion order breaks timestamp ties.
    fn sorted<F>(&self, filter: F) -> Vec<Draw>
    where
        F: Fn(&Draw) -> bool,
    {
        let inner = self.inner.read();
        let mut rows: Vec<&(u64, Draw)> = inner.draws.values().filter(|(_, d)| filter(d)).collect();
        rows.sort_by(|a, b| {
            b.1.created_at()
                .cmp(&a.1.created_at())
                .then_with(|| b.0.cmp(&a.0))
        });
        rows.into_iter().map(|(_, d)| d.clone()).collect()
    }
}

#[async_trait]
impl DrawStore for MemoryDrawStore {
    async fn insert(&self, draw: &Draw) -> Result<InsertOutcome> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let seq = inner.next_seq;

        match inner.draws.entry(draw.id().to_string()) {
            Entry::Occupied(_) => Ok(InsertOutcome::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert((seq, draw.clone()));
                inner.next_seq += 1;
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Draw>> {
        Ok(self.inner.read().draws.get(id).map(|(_, d)| d.clone()))
    }
}

#[async_trait]
impl DrawHistory for MemoryDrawStore {
    async fn list_by_owner(&self, owner: &str, limit: u32) -> Result<Vec<Draw>> {
        let mut draws = self.sorted(|d| d.owner() == Some(owner));
        draws.truncate(limit as usize);
        Ok(draws)
    }

    async fn list_page(&self, page: u32, per_page: u32) -> Result<DrawPage> {
        check_page(page, per_page)?;

        let all = self.sorted(|_| true);
        let total = all.len() as u64;
        let skip = (page as usize - 1).saturating_mul(per_page as usize);
        let draws = all.into_iter().skip(skip).take(per_page as usize).collect();

        Ok(DrawPage::new(draws, page, per_page, total))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().draws.remove(id).is_some())
    }

    async fn purge(&self) -> Result<u64> {
        let mut inner = self.inner.write();
        let removed = inner.draws.len() as u64;
        inner.draws.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(id: &str, owner: Option<&str>) -> Draw {
        Draw::restore(
            id.to_string(),
            owner.map(str::to_string),
            0,
            1,
            1,
            "ff".repeat(16),
            "ee".repeat(32),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_once() {
        let store = MemoryDrawStore::new();
        assert_eq!(store.insert(&sample("a", None)).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(
            store.insert(&sample("a", Some("x"))).await.unwrap(),
            InsertOutcome::DuplicateKey
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").await.unwrap().unwrap().owner(), None);
    }

    #[tokio::test]
    async fn test_history_and_purge() {
        let store = MemoryDrawStore::new();
        store.insert(&sample("a", Some("u"))).await.unwrap();
        store.insert(&sample("b", Some("v"))).await.unwrap();
        store.insert(&sample("c", Some("u"))).await.unwrap();

        let mine = store.list_by_owner("u", 10).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id(), "c");

        let page = store.list_page(2, 2).await.unwrap();
        assert_eq!(page.draws.len(), 1);
        assert_eq!(page.total_pages, 2);

        assert!(store.delete("b").await.unwrap());
        assert_eq!(store.purge().await.unwrap(), 2);
        assert!(store.is_empty());
    }
}
