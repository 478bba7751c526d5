use std::sync::Arc;

use crate::{api, NewsApiSource, NewsSource, RssSource};

pub const DEFAULT_FEED: &str = "https://www.theverge.com/rss/index.xml";

/// Configuration for one pipeline's set of sources.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub api_endpoint: String,
    /// News API credential; `None` means RSS-only ingestion.
    pub api_key: Option<String>,
    pub country: String,
    pub category: String,
    pub feeds: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_endpoint: api::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            country: "us".to_string(),
            category: "technology".to_string(),
            feeds: vec![DEFAULT_FEED.to_string()],
        }
    }
}

impl IngestConfig {
    /// Build the adapter list: RSS feeds in configuration order, the API
    /// adapter last, so the merged working set is deterministic.
    pub fn build_sources(&self) -> Vec<Arc<dyn NewsSource>> {
        let client = reqwest::Client::new();

        let mut sources: Vec<Arc<dyn NewsSource>> = self
            .feeds
            .iter()
            .map(|feed| {
                Arc::new(RssSource::new(client.clone(), feed.clone())) as Arc<dyn NewsSource>
            })
            .collect();

        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            sources.push(Arc::new(NewsApiSource::new(
                client,
                self.api_endpoint.clone(),
                key.to_string(),
                self.country.clone(),
                self.category.clone(),
            )));
        }

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_source_configured_last() {
        let config = IngestConfig {
            api_key: Some("k".to_string()),
            feeds: vec!["http://a/rss".to_string(), "http://b/rss".to_string()],
            ..Default::default()
        };
        let sources = config.build_sources();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].name(), "http://a/rss");
        assert_eq!(sources[2].name(), "newsapi");
    }

    #[test]
    fn test_missing_key_skips_api_source() {
        let sources = IngestConfig::default().build_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name(), DEFAULT_FEED);
    }

    #[test]
    fn test_blank_key_skips_api_source() {
        let config = IngestConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.build_sources().len(), 1);
    }
}
