use async_trait::async_trait;

use crate::types::{NewRecord, NewsFilter, NewsRecord};
use crate::Result;

/// Durable keyed storage for news records.
///
/// The ingestion pipeline only depends on `find_by_url` and `insert`; the
/// remaining operations back the query surface. An `insert` that returns
/// `Ok` is durable: there is no separate commit step.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Look up a record by exact URL match.
    async fn find_by_url(&self, url: &str) -> Result<Option<NewsRecord>>;

    /// Insert a record, assigning its id. Fails on a duplicate URL.
    async fn insert(&self, record: NewRecord) -> Result<NewsRecord>;

    /// Fetch a record by id.
    async fn get(&self, id: i64) -> Result<Option<NewsRecord>>;

    /// List records matching the filter, oldest first.
    async fn list(&self, filter: NewsFilter) -> Result<Vec<NewsRecord>>;

    /// Delete a record by id. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;
}
