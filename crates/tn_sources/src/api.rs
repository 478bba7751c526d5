use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tn_core::{ArticleDraft, Error, Result};
use tracing::debug;

use crate::NewsSource;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Adapter for the remote JSON news API.
///
/// Issues one GET with `{country, category, apiKey}` query parameters and
/// maps the `articles` array of the response into canonical drafts.
pub struct NewsApiSource {
    client: Client,
    endpoint: String,
    api_key: String,
    country: String,
    category: String,
}

impl NewsApiSource {
    pub fn new(
        client: Client,
        endpoint: String,
        api_key: String,
        country: String,
        category: String,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            country,
            category,
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch(&self) -> Result<Vec<ArticleDraft>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("country", self.country.as_str()),
                ("category", self.category.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let drafts = parse_body(&body)?;
        debug!("news API returned {} articles", drafts.len());
        Ok(drafts)
    }
}

/// Map a raw response body into drafts.
///
/// An unparseable body is an error; a parseable body without a usable
/// `articles` array yields an empty list. Entries without a `url` are
/// dropped since they can never be deduplicated.
pub(crate) fn parse_body(body: &str) -> Result<Vec<ArticleDraft>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::Feed(format!("invalid news API response: {}", e)))?;

    let articles = match value.get("articles").and_then(Value::as_array) {
        Some(articles) => articles,
        None => return Ok(Vec::new()),
    };

    Ok(articles.iter().filter_map(map_entry).collect())
}

fn map_entry(entry: &Value) -> Option<ArticleDraft> {
    let url = entry.get("url")?.as_str()?.to_string();

    Some(ArticleDraft {
        title: field(entry, "title").unwrap_or_else(|| "No Title".to_string()),
        description: field(entry, "description").unwrap_or_default(),
        url,
        source_name: entry
            .pointer("/source/name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        published_at: field(entry, "publishedAt"),
    })
}

fn field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}
