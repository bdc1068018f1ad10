//! Google Trends trend source and article scraper.
//!
//! Trends come from the daily Google Trends RSS feed. Each feed item lists a
//! handful of news articles about the trend; when those are not enough the
//! list is topped up from a Google News RSS search for the trend name.
//! Articles are fetched one at a time and reduced to their paragraph text.
//!
//! # URL Pattern
//!
//! ```text
//! https://trends.google.com/trending/rss?geo=US
//! https://news.google.com/rss/search?q=<trend>&hl=en-US&gl=US&ceid=US:en
//! ```

use crate::models::Article;
use crate::services::{ContentScraper, TrendSource};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const TRENDS_FEED_URL: &str = "https://trends.google.com/trending/rss";
const NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

/// Paragraphs shorter than this are navigation crumbs, captions and the like.
const MIN_PARAGRAPH_CHARS: usize = 40;

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
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(rename = "ht:news_item", alias = "news_item", default)]
    news_items: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(rename = "ht:news_item_url", alias = "news_item_url", default)]
    url: Option<String>,
}

/// Parse an RSS document into its items.
fn parse_feed(xml: &str) -> anyhow::Result<Vec<FeedItem>> {
    let rss: Rss = quick_xml::de::from_str(xml).context("parsing RSS feed")?;
    Ok(rss.channel.items)
}

/// Extract readable paragraph text from an article page.
///
/// Returns an empty string when the page has no paragraph long enough to be
/// body text.
fn extract_paragraphs(html: &str) -> anyhow::Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").map_err(|e| anyhow!("invalid selector: {e:?}"))?;

    let paragraphs = document
        .select(&selector)
        .map(|p| p.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().join(" "))
        .filter(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
        .join("\n");
    Ok(paragraphs)
}

/// [`TrendSource`] and [`ContentScraper`] backed by Google Trends.
#[derive(Debug, Clone)]
pub struct GoogleTrends {
    client: reqwest::Client,
    geo: String,
}

impl GoogleTrends {
    /// Create a source for the given two-letter region code (e.g. `"US"`).
    pub fn new(geo: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            geo: geo.into(),
        }
    }

    #[instrument(level = "info", skip_all, fields(geo = %self.geo))]
    async fn fetch_feed(&self) -> anyhow::Result<Vec<FeedItem>> {
        let mut url = Url::parse(TRENDS_FEED_URL)?;
        url.query_pairs_mut().append_pair("geo", &self.geo);

        let xml = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let items = parse_feed(&xml)?;
        info!(count = items.len(), "Fetched trends feed");
        Ok(items)
    }

    /// Article links from a Google News search for `trend`.
    #[instrument(level = "info", skip_all, fields(%trend))]
    async fn search_news(&self, trend: &str) -> anyhow::Result<Vec<String>> {
        let url = format!(
            "{}?q={}&hl=en-{geo}&gl={geo}&ceid={geo}:en",
            NEWS_SEARCH_URL,
            urlencoding::encode(trend),
            geo = self.geo
        );
        let xml = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let links: Vec<String> = parse_feed(&xml)?
            .into_iter()
            .filter_map(|item| item.link)
            .collect();
        debug!(count = links.len(), "News search links");
        Ok(links)
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_article(&self, url: &str) -> anyhow::Result<Option<Article>> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let content = extract_paragraphs(&body)?;
        if content.is_empty() {
            return Ok(None);
        }
        info!(bytes = content.len(), "Parsed article");
        Ok(Some(Article {
            source: url.to_string(),
            content,
        }))
    }
}

#[async_trait]
impl TrendSource for GoogleTrends {
    async fn list_trends(&self) -> anyhow::Result<Vec<String>> {
        let items = self.fetch_feed().await?;
        Ok(items.into_iter().map(|item| item.title).collect())
    }
}

#[async_trait]
impl ContentScraper for GoogleTrends {
    #[instrument(level = "info", skip(self))]
    async fn fetch_articles(&self, trend_index: usize, count: usize) -> anyhow::Result<Vec<Article>> {
        let items = self.fetch_feed().await?;
        let total = items.len();
        let item = items
            .into_iter()
            .nth(trend_index)
            .ok_or_else(|| anyhow!("trend index {} out of range ({} trends)", trend_index, total))?;

        let mut urls: Vec<String> = item.news_items.into_iter().filter_map(|n| n.url).collect();
        if urls.len() < count {
            match self.search_news(&item.title).await {
                Ok(links) => urls.extend(links),
                Err(e) => warn!(error = %format!("{e:#}"), "News search failed; using trend links only"),
            }
        }
        let urls: Vec<String> = urls.into_iter().unique().take(count).collect();

        let articles: Vec<Article> = stream::iter(urls)
            .then(|url| async move {
                match self.fetch_article(&url).await {
                    Ok(Some(article)) => Some(article),
                    Ok(None) => {
                        warn!(%url, "Article produced no content");
                        None
                    }
                    Err(e) => {
                        error!(%url, error = %format!("{e:#}"), "Article fetch failed");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(trend = %item.title, count = articles.len(), "Fetched trend articles");
        Ok(articles)
    }
}
