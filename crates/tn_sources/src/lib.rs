use async_trait::async_trait;
use tn_core::{ArticleDraft, Result};

pub mod api;
pub mod config;
pub mod pipeline;
pub mod rss;

pub use api::NewsApiSource;
pub use config::IngestConfig;
pub use pipeline::IngestionPipeline;
pub use rss::RssSource;

/// A source of news articles in canonical form.
///
/// Adapters are allowed to fail; the ingestion pipeline catches each
/// adapter's error, records it, and continues with the other sources.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Label used in logs and error reports.
    fn name(&self) -> &str;

    /// Fetch the currently published articles from this source.
    async fn fetch(&self) -> Result<Vec<ArticleDraft>>;
}

pub mod prelude {
    pub use super::NewsSource;
    pub use tn_core::{ArticleDraft, Error, Result};
}
