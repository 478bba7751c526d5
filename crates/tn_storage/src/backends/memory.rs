use async_trait::async_trait;
use tn_core::{Error, NewRecord, NewsFilter, NewsRecord, NewsStore, Result};
use tokio::sync::RwLock;

/// In-memory store, used by tests and `--storage memory`.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    records: Vec<NewsRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<NewsRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.url == url).cloned())
    }

    async fn insert(&self, record: NewRecord) -> Result<NewsRecord> {
        let mut inner = self.inner.write().await;
        if inner.records.iter().any(|r| r.url == record.url) {
            return Err(Error::Storage(format!("duplicate url: {}", record.url)));
        }
        let stored = NewsRecord {
            id: inner.next_id,
            title: record.title,
            content: record.content,
            source: record.source,
            url: record.url,
            published_at: record.published_at,
        };
        inner.next_id += 1;
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<NewsRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: NewsFilter) -> Result<Vec<NewsRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| {
                filter
                    .title
                    .as_deref()
                    .map_or(true, |t| r.title.contains(t))
                    && filter
                        .source
                        .as_deref()
                        .map_or(true, |s| r.source.contains(s))
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        Ok(inner.records.len() < before)
    }
}
