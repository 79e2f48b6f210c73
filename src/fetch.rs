// src/fetch.rs
// Feed boundary: everything loosely-typed from the wire is wrapped into
// `RawEntry` here so downstream code never inspects raw feed structures.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

/// One feed entry, strictly typed. Timestamp candidates stay as raw strings;
/// parsing happens in `published_at_or`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub created: Option<String>,
    /// Publisher-supplied image (media:content / media:thumbnail / enclosure).
    pub media_url: Option<String>,
}

impl RawEntry {
    /// Best-effort timestamp: first parseable of published → updated →
    /// created, else `now`. Ordering logic downstream never sees an absent
    /// timestamp.
    pub fn published_at_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        [&self.published, &self.updated, &self.created]
            .into_iter()
            .flatten()
            .find_map(|s| parse_wire_timestamp(s))
            .unwrap_or(now)
    }
}

/// RFC 2822 (RSS pubDate, including obsolete zone names like GMT) first,
/// then RFC 3339.
pub fn parse_wire_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Pulls entries from one endpoint. Implementations must bound the result
/// by `limit`; a transport or parse failure surfaces as `Err` and the caller
/// degrades that endpoint to zero entries.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self, url: &str, limit: usize) -> Result<Vec<RawEntry>>;
}

// --- RSS 2.0 wire structs ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    updated: Option<String>,
    created: Option<String>,
    // quick-xml's deserializer reports namespaced elements by local name,
    // so media:content arrives as "content".
    #[serde(rename = "content", default)]
    media_content: Vec<MediaRef>,
    #[serde(rename = "thumbnail", default)]
    media_thumbnail: Vec<MediaRef>,
    #[serde(rename = "enclosure", default)]
    enclosures: Vec<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
}

impl FeedItem {
    fn media_url(&self) -> Option<String> {
        self.media_content
            .iter()
            .chain(self.media_thumbnail.iter())
            .chain(self.enclosures.iter())
            .find_map(|m| m.url.clone())
    }
}

/// Parse an RSS document into at most `limit` raw entries.
pub fn parse_feed_str(xml: &str, limit: usize) -> Result<Vec<RawEntry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.items.len().min(limit));
    for it in rss.channel.items.into_iter().take(limit) {
        let media_url = it.media_url();
        out.push(RawEntry {
            title: it.title,
            summary: it.description,
            link: it.link,
            published: it.pub_date,
            updated: it.updated,
            created: it.created,
            media_url,
        });
    }
    Ok(out)
}

// Feeds routinely embed HTML entities quick-xml refuses; swap the common
// ones for literals before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// HTTP implementation. One client, one timeout for every endpoint.
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_entries(&self, url: &str, limit: usize) -> Result<Vec<RawEntry>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching feed {url}"))?
            .text()
            .await
            .with_context(|| format!("reading feed body {url}"))?;
        parse_feed_str(&body, limit)
    }
}

/// In-memory implementation for tests and offline runs: url → RSS document.
#[derive(Default)]
pub struct FixtureFeedSource {
    feeds: HashMap<String, String>,
}

impl FixtureFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, xml: &str) -> Self {
        self.feeds.insert(url.to_string(), xml.to_string());
        self
    }
}

#[async_trait]
impl FeedSource for FixtureFeedSource {
    async fn fetch_entries(&self, url: &str, limit: usize) -> Result<Vec<RawEntry>> {
        let xml = self
            .feeds
            .get(url)
            .with_context(|| format!("no fixture for {url}"))?;
        parse_feed_str(xml, limit)
    }
}
