use async_trait::async_trait;
use reqwest::Client;
use tn_core::{ArticleDraft, Error, Result};
use tracing::debug;

use crate::NewsSource;

/// Adapter for one RSS or Atom feed.
pub struct RssSource {
    client: Client,
    feed_url: String,
}

impl RssSource {
    pub fn new(client: Client, feed_url: String) -> Self {
        Self { client, feed_url }
    }
}

#[async_trait]
impl NewsSource for RssSource {
    fn name(&self) -> &str {
        &self.feed_url
    }

    async fn fetch(&self) -> Result<Vec<ArticleDraft>> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await?
            .error_for_status()?;
        let content = response.bytes().await?;

        // Try RSS first, then Atom.
        if let Ok(channel) = rss::Channel::read_from(&content[..]) {
            let drafts = map_channel(&channel);
            debug!("{} returned {} RSS items", self.feed_url, drafts.len());
            return Ok(drafts);
        }

        if let Ok(feed) = atom_syndication::Feed::read_from(&content[..]) {
            let drafts = map_feed(&feed);
            debug!("{} returned {} Atom entries", self.feed_url, drafts.len());
            return Ok(drafts);
        }

        Err(Error::Feed(format!(
            "not a recognizable RSS or Atom feed: {}",
            self.feed_url
        )))
    }
}

pub(crate) fn map_channel(channel: &rss::Channel) -> Vec<ArticleDraft> {
    let source_name = non_empty(channel.title()).unwrap_or("RSS Source");

    channel
        .items()
        .iter()
        .map(|item| ArticleDraft {
            title: item.title().unwrap_or("No Title").to_string(),
            description: item
                .description()
                .or_else(|| item.content())
                .unwrap_or_default()
                .to_string(),
            url: item.link().unwrap_or_default().to_string(),
            source_name: source_name.to_string(),
            published_at: item.pub_date().map(str::to_string),
        })
        .collect()
}

pub(crate) fn map_feed(feed: &atom_syndication::Feed) -> Vec<ArticleDraft> {
    let source_name = non_empty(feed.title()).unwrap_or("RSS Source");

    feed.entries()
        .iter()
        .map(|entry| ArticleDraft {
            title: non_empty(entry.title()).unwrap_or("No Title").to_string(),
            description: entry
                .summary()
                .map(|s| s.as_str())
                .or_else(|| entry.content().and_then(|c| c.value()))
                .unwrap_or_default()
                .to_string(),
            url: entry
                .links()
                .first()
                .map(|l| l.href().to_string())
                .unwrap_or_default(),
            source_name: source_name.to_string(),
            // Atom timestamps are RFC 3339 already.
            published_at: Some(
                entry
                    .published()
                    .unwrap_or_else(|| entry.updated())
                    .to_rfc3339(),
            ),
        })
        .collect()
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
