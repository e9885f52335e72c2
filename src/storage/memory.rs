use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ReelStore, StoreError};
use crate::models::{NewReel, Reel};

/// Volatile backend. Ids come from a counter starting at 1 and are never
/// reused, so ordering the map by id is the same as insertion order.
#[derive(Debug)]
pub struct MemStorage {
    inner: RwLock<MemInner>,
}

#[derive(Debug)]
struct MemInner {
    reels: BTreeMap<i32, Reel>,
    next_id: i32,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemInner {
                reels: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReelStore for MemStorage {
    async fn list(&self) -> Result<Vec<Reel>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reels.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Reel>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.reels.get(&id).cloned())
    }

    async fn create(&self, reel: NewReel) -> Result<Reel, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        let reel = reel.into_reel(id);
        inner.reels.insert(id, reel.clone());
        inner.next_id += 1;

        tracing::debug!(id, title = %reel.title, "Stored reel in memory");
        Ok(reel)
    }
}
