use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tn_core::{dates, IngestReport, NewRecord, NewsStore, Result, SourceError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::NewsSource;

/// Orchestrates one ingestion run: fetch every source, merge, deduplicate
/// against the store by URL, and persist what is new.
///
/// The pipeline holds no state between runs beyond its store handle; the
/// internal mutex only serializes overlapping invocations, so a scheduled
/// run and an on-demand trigger never race on the same store.
pub struct IngestionPipeline {
    store: Arc<dyn NewsStore>,
    sources: Vec<Arc<dyn NewsSource>>,
    run_guard: Mutex<()>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn NewsStore>, sources: Vec<Arc<dyn NewsSource>>) -> Self {
        Self {
            store,
            sources,
            run_guard: Mutex::new(()),
        }
    }

    /// Run the pipeline across all configured sources.
    ///
    /// Per-source and per-article failures are recorded in the report and
    /// never abort the run; only storage failures propagate.
    pub async fn run(&self) -> Result<IngestReport> {
        let _guard = self.run_guard.lock().await;

        info!("🗞️  starting ingestion run across {} sources", self.sources.len());
        let mut report = IngestReport::default();

        // Fetch concurrently; join_all keeps configuration order, so the
        // merged working set is deterministic.
        let results = join_all(self.sources.iter().map(|s| s.fetch())).await;

        let mut drafts = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(mut batch) => {
                    debug!("{} contributed {} articles", source.name(), batch.len());
                    drafts.append(&mut batch);
                }
                Err(e) => {
                    warn!("source {} failed: {}", source.name(), e);
                    report.errors.push(SourceError {
                        source: source.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.fetched = drafts.len();
        if drafts.is_empty() {
            info!("no articles fetched, nothing to ingest");
            return Ok(report);
        }

        for draft in drafts {
            if draft.url.is_empty() {
                report.errors.push(SourceError {
                    source: draft.source_name.clone(),
                    message: format!("article without a url: {:?}", draft.title),
                });
                continue;
            }

            // Insert-then-check per article, so a later duplicate within
            // this same run is also detected.
            if self.store.find_by_url(&draft.url).await?.is_some() {
                debug!("skipping duplicate {}", draft.url);
                report.skipped += 1;
                continue;
            }

            let published_at = match &draft.published_at {
                Some(raw) => match dates::normalize(raw) {
                    Ok(instant) => instant,
                    // Reject instead of fabricating a timestamp.
                    Err(e) => {
                        warn!("rejecting {}: {}", draft.url, e);
                        report.errors.push(SourceError {
                            source: draft.source_name.clone(),
                            message: format!("{}: {}", draft.url, e),
                        });
                        continue;
                    }
                },
                // Feeds that publish no date at all get the ingestion time.
                None => Utc::now(),
            };

            let source = if draft.source_name.trim().is_empty() {
                "Unknown".to_string()
            } else {
                draft.source_name
            };

            self.store
                .insert(NewRecord {
                    title: draft.title,
                    content: draft.description,
                    source,
                    url: draft.url,
                    published_at,
                })
                .await?;
            report.inserted += 1;
        }

        info!(
            "✨ ingestion run finished: {} fetched, {} inserted, {} skipped, {} errors",
            report.fetched,
            report.inserted,
            report.skipped,
            report.errors.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tn_core::{ArticleDraft, Error, NewsFilter};
    use tn_storage::MemoryStore;

    struct StaticSource {
        label: String,
        drafts: Vec<ArticleDraft>,
    }

    impl StaticSource {
        fn new(label: &str, drafts: Vec<ArticleDraft>) -> Arc<Self> {
            Arc::new(Self {
                label: label.to_string(),
                drafts,
            })
        }
    }

    #[async_trait]
    impl NewsSource for StaticSource {
        fn name(&self) -> &str {
            &self.label
        }

        async fn fetch(&self) -> tn_core::Result<Vec<ArticleDraft>> {
            Ok(self.drafts.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl NewsSource for FailingSource {
        fn name(&self) -> &str {
            "newsapi"
        }

        async fn fetch(&self) -> tn_core::Result<Vec<ArticleDraft>> {
            Err(Error::Feed("connection refused".to_string()))
        }
    }

    fn draft(url: &str, title: &str) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            description: "body".to_string(),
            url: url.to_string(),
            source_name: "Example Tech".to_string(),
            published_at: Some("2024-01-01T15:00:00Z".to_string()),
        }
    }

    fn pipeline(
        store: Arc<MemoryStore>,
        sources: Vec<Arc<dyn NewsSource>>,
    ) -> IngestionPipeline {
        IngestionPipeline::new(store, sources)
    }

    #[tokio::test]
    async fn test_inserts_new_articles() {
        let store = Arc::new(MemoryStore::new());
        let source = StaticSource::new("feed", vec![draft("http://a", "A"), draft("http://b", "B")]);
        let report = pipeline(store.clone(), vec![source]).run().await.unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());
        assert!(store.find_by_url("http://a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let source = StaticSource::new("feed", vec![draft("http://a", "A")]);
        let p = pipeline(store.clone(), vec![source]);

        let first = p.run().await.unwrap();
        assert_eq!(first.inserted, 1);

        let second = p.run().await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(store.list(NewsFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_run_duplicates_first_wins() {
        let store = Arc::new(MemoryStore::new());
        // Same URL from two different sources, different titles.
        let rss = StaticSource::new("feed", vec![draft("http://a", "From RSS")]);
        let api = StaticSource::new("api", vec![draft("http://a", "From API")]);
        let report = pipeline(store.clone(), vec![rss, api]).run().await.unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
        let stored = store.find_by_url("http://a").await.unwrap().unwrap();
        assert_eq!(stored.title, "From RSS");
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let store = Arc::new(MemoryStore::new());
        let rss = StaticSource::new("feed", vec![draft("http://a", "A")]);
        let report = pipeline(store.clone(), vec![rss, Arc::new(FailingSource)])
            .run()
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].source, "newsapi");
        assert!(store.find_by_url("http://a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_sources_short_circuit() {
        let store = Arc::new(MemoryStore::new());
        let source = StaticSource::new("feed", vec![]);
        let report = pipeline(store.clone(), vec![source]).run().await.unwrap();

        assert_eq!(report.fetched, 0);
        assert_eq!(report.inserted, 0);
        assert!(report.errors.is_empty());
        assert!(store.list(NewsFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_source_name_becomes_unknown() {
        let store = Arc::new(MemoryStore::new());
        let mut d = draft("http://a", "A");
        d.source_name = String::new();
        let source = StaticSource::new("feed", vec![d]);
        pipeline(store.clone(), vec![source]).run().await.unwrap();

        let stored = store.find_by_url("http://a").await.unwrap().unwrap();
        assert_eq!(stored.source, "Unknown");
    }

    #[tokio::test]
    async fn test_unparseable_date_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut bad = draft("http://bad", "Bad");
        bad.published_at = Some("three days ago".to_string());
        let source = StaticSource::new("feed", vec![bad, draft("http://ok", "Ok")]);
        let report = pipeline(store.clone(), vec![source]).run().await.unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(store.find_by_url("http://bad").await.unwrap().is_none());
        assert!(store.find_by_url("http://ok").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_date_defaults_to_ingestion_time() {
        let store = Arc::new(MemoryStore::new());
        let mut d = draft("http://a", "A");
        d.published_at = None;
        let before = Utc::now();
        let source = StaticSource::new("feed", vec![d]);
        pipeline(store.clone(), vec![source]).run().await.unwrap();

        let stored = store.find_by_url("http://a").await.unwrap().unwrap();
        assert!(stored.published_at >= before);
        assert!(stored.published_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_urlless_draft_recorded_as_error() {
        let store = Arc::new(MemoryStore::new());
        let mut d = draft("", "No link");
        d.source_name = "Example Tech".to_string();
        let source = StaticSource::new("feed", vec![d]);
        let report = pipeline(store.clone(), vec![source]).run().await.unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.errors.len(), 1);
    }
}
