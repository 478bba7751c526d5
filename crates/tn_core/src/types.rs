use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Adapter-normalized news item, before deduplication and persistence.
///
/// `published_at` carries the raw source string; the ingestion pipeline is
/// responsible for turning it into a canonical UTC instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source_name: String,
    pub published_at: Option<String>,
}

/// Persisted news item. `url` is unique across all records and serves as
/// the deduplication key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// Insert shape, without the storage-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// Substring filters for listing records. Both filters combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsFilter {
    pub title: Option<String>,
    pub source: Option<String>,
}

/// Outcome of one ingestion run across all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<SourceError>,
}

/// A non-fatal failure recorded during an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    pub message: String,
}
